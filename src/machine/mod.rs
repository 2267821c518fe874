//! The transition-execution core.
//!
//! A [`StateMachine`] is one live instance of a shared [`StateModel`]. It
//! owns everything mutable: the current leaf state, the active/history
//! registry, the deferred-execution stack, and the notification hub. All
//! methods take `&self`; interior mutability is what lets an action
//! re-enter the same instance synchronously (fire a follow-up event,
//! terminate) while an outer call is still executing.

use crate::core::{Ident, MachineError, MachineResult, MachineStatus};
use crate::exec::ActionExecutor;
use crate::model::{EntryPolicy, RawState, StateModel, Transition};
use crate::notify::{
    LifecycleKind, LifecycleNotice, NotificationHub, TransitionNotice, TransitionPhase,
};
use crate::registry::StateRegistry;
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Observable result of a [`fire`](StateMachine::fire) call.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FireOutcome<S: Ident> {
    /// A transition ran; the machine now rests on this leaf state.
    Completed(S),
    /// No declared transition matched the event; nothing changed.
    Declined,
}

/// One live instance of a state model.
///
/// Instances are single-threaded: `start`/`fire`/`terminate` run to
/// completion before returning, and nothing here is internally
/// synchronized. Share the model across instances, not the instance across
/// threads.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use strata::ident_enum;
/// use strata::machine::{FireOutcome, StateMachine};
/// use strata::model::{ModelBuilder, Transition};
///
/// ident_enum! {
///     enum AtmState { Idle, Loading }
/// }
/// ident_enum! {
///     enum AtmEvent { Connected }
/// }
///
/// let model = ModelBuilder::<AtmState, AtmEvent, ()>::new()
///     .state(AtmState::Idle)
///     .state(AtmState::Loading)
///     .transition(Transition::new(
///         AtmState::Idle,
///         AtmEvent::Connected,
///         AtmState::Loading,
///     ))
///     .build()
///     .unwrap();
///
/// let machine = StateMachine::new(Arc::new(model), AtmState::Idle).unwrap();
/// machine.start(()).unwrap();
/// let outcome = machine.fire(AtmEvent::Connected, ()).unwrap();
/// assert_eq!(outcome, FireOutcome::Completed(AtmState::Loading));
/// assert_eq!(machine.current_state(), Some(AtmState::Loading));
/// ```
pub struct StateMachine<S: Ident, E: Ident, C: Send + Sync + 'static> {
    model: Arc<StateModel<S, E, C>>,
    initial: S,
    instance: Uuid,
    status: Cell<MachineStatus>,
    invalid: Cell<bool>,
    current: RefCell<Option<S>>,
    registry: StateRegistry<S, E, C>,
    executor: ActionExecutor<S, E, C>,
    hub: NotificationHub<S, E, C>,
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> StateMachine<S, E, C> {
    /// Create an instance of `model` that will start in `initial`.
    ///
    /// Fails with [`MachineError::UnknownState`] when `initial` is not
    /// declared by the model.
    pub fn new(model: Arc<StateModel<S, E, C>>, initial: S) -> MachineResult<Self> {
        if !model.contains(&initial) {
            return Err(MachineError::UnknownState(initial.name().to_string()));
        }
        Ok(Self {
            registry: StateRegistry::new(Arc::clone(&model)),
            model,
            initial,
            instance: Uuid::new_v4(),
            status: Cell::new(MachineStatus::Initialized),
            invalid: Cell::new(false),
            current: RefCell::new(None),
            executor: ActionExecutor::new(),
            hub: NotificationHub::new(),
        })
    }

    /// Unique id of this live instance.
    pub fn instance_id(&self) -> Uuid {
        self.instance
    }

    /// Current lifecycle status.
    pub fn status(&self) -> MachineStatus {
        self.status.get()
    }

    /// The current leaf state; `None` before `start`.
    pub fn current_state(&self) -> Option<S> {
        self.current.borrow().clone()
    }

    /// The state the instance starts in.
    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    /// The shared immutable model.
    pub fn model(&self) -> &Arc<StateModel<S, E, C>> {
        &self.model
    }

    /// This instance's notification channels.
    pub fn notifications(&self) -> &NotificationHub<S, E, C> {
        &self.hub
    }

    /// This instance's active-children/history registry.
    pub fn registry(&self) -> &StateRegistry<S, E, C> {
        &self.registry
    }

    /// Number of open action batches; zero between calls.
    pub fn execution_depth(&self) -> usize {
        self.executor.depth()
    }

    /// Resolve the immutable definition of `id`.
    pub fn raw_state_from(&self, id: &S) -> MachineResult<&RawState<S, E, C>> {
        self.registry.raw_state_from(id)
    }

    /// Active children of `parent`, in activation order.
    pub fn active_children_of(&self, parent: &S) -> Vec<S> {
        self.registry.active_children_of(parent)
    }

    /// The last active child recorded for `parent`, if any.
    pub fn last_active_child_of(&self, parent: &S) -> MachineResult<Option<S>> {
        self.registry.last_active_child_of(parent)
    }

    /// Overwrite the history record for `parent`.
    pub fn set_last_active_child(&self, parent: &S, child: &S) -> MachineResult<()> {
        self.registry.set_last_active_child(parent, child)
    }

    /// Start the instance: enter every state from the root down to the
    /// initial leaf, in that order, then become idle.
    ///
    /// Only valid while `Initialized`. If an entry action fails the error
    /// propagates, no state is entered, and the instance stays
    /// `Initialized`.
    pub fn start(&self, context: C) -> MachineResult<()> {
        self.ensure_valid("start")?;
        let status = self.status.get();
        if status != MachineStatus::Initialized {
            return Err(MachineError::illegal_status("start", status));
        }
        let context = Arc::new(context);

        let path = self.start_path()?;
        self.executor.begin();
        for id in &path {
            let raw = self.registry.raw_state_from(id)?;
            for action in raw.entry_actions() {
                self.executor
                    .defer(action, raw.parent(), Some(id), None, &context)?;
            }
        }
        self.executor.execute(self)?;

        if let Err(err) = self.activate_path(&path) {
            self.invalid.set(true);
            return Err(err);
        }
        *self.current.borrow_mut() = path.last().cloned();
        self.status.set(MachineStatus::Idle);
        debug!(
            machine = %self.instance,
            state = path.last().map(|s| s.name()).unwrap_or_default(),
            "state machine started"
        );
        self.hub.publish_lifecycle(&LifecycleNotice {
            kind: LifecycleKind::Started,
            machine: self,
            context: &context,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Fire an event.
    ///
    /// Valid while `Idle`, or while `Busy` for the synchronous reentrant
    /// case (an action firing a follow-up event on its own machine). A
    /// declined event changes nothing and reports
    /// [`FireOutcome::Declined`]; a failing action propagates its error
    /// after the exception notice, with the instance back to `Idle` and
    /// its pre-transition state intact.
    pub fn fire(&self, event: E, context: C) -> MachineResult<FireOutcome<S>> {
        self.ensure_valid("fire")?;
        let status = self.status.get();
        if !status.accepts_events() {
            return Err(MachineError::illegal_status("fire", status));
        }
        let leaf = self
            .current
            .borrow()
            .clone()
            .ok_or_else(|| MachineError::illegal("fire", "machine has no current state"))?;
        self.status.set(MachineStatus::Busy);
        let context = Arc::new(context);

        self.hub.publish_transition(&TransitionNotice {
            phase: TransitionPhase::Begin,
            source: &leaf,
            event: &event,
            context: &context,
            machine: self,
            at: Utc::now(),
        });

        let Some(transition) = self.resolve(&leaf, &event, &context)? else {
            debug!(
                machine = %self.instance,
                event = event.name(),
                state = leaf.name(),
                "transition declined"
            );
            self.hub.publish_transition(&TransitionNotice {
                phase: TransitionPhase::Declined,
                source: &leaf,
                event: &event,
                context: &context,
                machine: self,
                at: Utc::now(),
            });
            if !self.status.get().is_terminated() {
                self.status.set(MachineStatus::Idle);
            }
            return Ok(FireOutcome::Declined);
        };

        let target = transition.target().clone();
        let boundary = self
            .model
            .least_common_ancestor(transition.source(), &target);
        let exit_set = self.exit_set(&leaf, boundary.as_ref())?;
        let entry_set = self.entry_set(transition, boundary.as_ref())?;
        let new_leaf = entry_set.last().cloned().unwrap_or_else(|| target.clone());

        self.executor.begin();
        for id in &exit_set {
            let raw = self.registry.raw_state_from(id)?;
            for action in raw.exit_actions() {
                self.executor
                    .defer(action, Some(id), raw.parent(), Some(&event), &context)?;
            }
        }
        for action in transition.actions() {
            self.executor.defer(
                action,
                Some(transition.source()),
                Some(&target),
                Some(&event),
                &context,
            )?;
        }
        for id in &entry_set {
            let raw = self.registry.raw_state_from(id)?;
            for action in raw.entry_actions() {
                self.executor
                    .defer(action, raw.parent(), Some(id), Some(&event), &context)?;
            }
        }

        match self.executor.execute(self) {
            Ok(()) => {
                if let Err(err) = self.apply_transition(&exit_set, &entry_set, &new_leaf) {
                    self.invalid.set(true);
                    return Err(err);
                }
                if !self.status.get().is_terminated() {
                    self.status.set(MachineStatus::Idle);
                }
                debug!(
                    machine = %self.instance,
                    event = event.name(),
                    from = leaf.name(),
                    to = new_leaf.name(),
                    "transition complete"
                );
                self.hub.publish_transition(&TransitionNotice {
                    phase: TransitionPhase::Complete { target: &target },
                    source: &leaf,
                    event: &event,
                    context: &context,
                    machine: self,
                    at: Utc::now(),
                });
                Ok(FireOutcome::Completed(new_leaf))
            }
            Err(err) => {
                if !self.status.get().is_terminated() {
                    self.status.set(MachineStatus::Idle);
                }
                debug!(
                    machine = %self.instance,
                    event = event.name(),
                    error = %err,
                    "transition failed"
                );
                self.hub.publish_transition(&TransitionNotice {
                    phase: TransitionPhase::Exception {
                        target: &target,
                        error: &err,
                    },
                    source: &leaf,
                    event: &event,
                    context: &context,
                    machine: self,
                    at: Utc::now(),
                });
                Err(err)
            }
        }
    }

    /// Terminate the instance, running exit actions from the current leaf
    /// up to the root.
    ///
    /// Valid while `Idle` or `Busy`; not idempotent. Exit-action failures
    /// propagate, but the instance terminates regardless.
    pub fn terminate(&self, context: C) -> MachineResult<()> {
        self.ensure_valid("terminate")?;
        let status = self.status.get();
        if !status.accepts_events() {
            return Err(MachineError::illegal_status("terminate", status));
        }
        let context = Arc::new(context);

        self.executor.begin();
        let mut cursor = self.current.borrow().clone();
        while let Some(id) = cursor {
            let raw = self.registry.raw_state_from(&id)?;
            for action in raw.exit_actions() {
                self.executor
                    .defer(action, Some(&id), raw.parent(), None, &context)?;
            }
            cursor = raw.parent().cloned();
        }
        let result = self.executor.execute(self);

        self.finish_termination(&context);
        result
    }

    /// Terminate the instance without running any exit actions.
    pub fn terminate_without_exit_states(&self, context: C) -> MachineResult<()> {
        self.ensure_valid("terminate")?;
        let status = self.status.get();
        if !status.accepts_events() {
            return Err(MachineError::illegal_status("terminate", status));
        }
        let context = Arc::new(context);
        self.finish_termination(&context);
        Ok(())
    }

    fn finish_termination(&self, context: &Arc<C>) {
        self.status.set(MachineStatus::Terminated);
        debug!(machine = %self.instance, "state machine terminated");
        self.hub.publish_lifecycle(&LifecycleNotice {
            kind: LifecycleKind::Terminated,
            machine: self,
            context,
            at: Utc::now(),
        });
    }

    fn ensure_valid(&self, operation: &'static str) -> MachineResult<()> {
        if self.invalid.get() {
            return Err(MachineError::illegal(
                operation,
                "instance was invalidated by an earlier registry failure",
            ));
        }
        Ok(())
    }

    /// Chain from the root down to the initial leaf, descending through
    /// default children below the configured initial state.
    fn start_path(&self) -> MachineResult<Vec<S>> {
        let mut path = self
            .model
            .path_from_root(&self.initial)
            .ok_or_else(|| MachineError::UnknownState(self.initial.name().to_string()))?;
        let mut leaf = path.last().cloned();
        while let Some(id) = leaf {
            let next = self.registry.raw_state_from(&id)?.default_child().cloned();
            if let Some(child) = &next {
                path.push(child.clone());
            }
            leaf = next;
        }
        Ok(path)
    }

    /// First passing candidate, scanning the active chain leaf→root and
    /// each level's candidates in declaration order.
    fn resolve(
        &self,
        leaf: &S,
        event: &E,
        context: &C,
    ) -> MachineResult<Option<&Transition<S, E, C>>> {
        let mut cursor = Some(leaf.clone());
        while let Some(id) = cursor {
            for candidate in self.model.candidates(&id, event) {
                if candidate.passes(event, context) {
                    return Ok(Some(candidate));
                }
            }
            cursor = self.registry.raw_state_from(&id)?.parent().cloned();
        }
        Ok(None)
    }

    /// Active states from `leaf` up to the boundary, exclusive of it.
    fn exit_set(&self, leaf: &S, boundary: Option<&S>) -> MachineResult<Vec<S>> {
        let mut exits = Vec::new();
        let mut cursor = Some(leaf.clone());
        while let Some(id) = cursor {
            if Some(&id) == boundary {
                break;
            }
            cursor = self.registry.raw_state_from(&id)?.parent().cloned();
            exits.push(id);
        }
        Ok(exits)
    }

    /// States entered from the boundary (exclusive) down through the
    /// target and into its subtree, honoring the transition's entry
    /// policy.
    fn entry_set(
        &self,
        transition: &Transition<S, E, C>,
        boundary: Option<&S>,
    ) -> MachineResult<Vec<S>> {
        let mut chain = Vec::new();
        let mut cursor = Some(transition.target().clone());
        while let Some(id) = cursor {
            if Some(&id) == boundary {
                break;
            }
            cursor = self.registry.raw_state_from(&id)?.parent().cloned();
            chain.push(id);
        }
        chain.reverse();

        let mut cursor = transition.target().clone();
        loop {
            let raw = self.registry.raw_state_from(&cursor)?;
            let next = match transition.entry_policy() {
                EntryPolicy::History => match self.registry.last_active_child_of(&cursor)? {
                    Some(child) => Some(child),
                    None => raw.default_child().cloned(),
                },
                EntryPolicy::Default => raw.default_child().cloned(),
            };
            match next {
                Some(child) => {
                    chain.push(child.clone());
                    cursor = child;
                }
                None => break,
            }
        }
        Ok(chain)
    }

    fn activate_path(&self, path: &[S]) -> MachineResult<()> {
        for pair in path.windows(2) {
            self.registry.set_active_child(&pair[0], &pair[1])?;
        }
        Ok(())
    }

    fn apply_transition(&self, exit_set: &[S], entry_set: &[S], new_leaf: &S) -> MachineResult<()> {
        for id in exit_set {
            let parent = self.registry.raw_state_from(id)?.parent().cloned();
            if let Some(parent) = parent {
                self.registry.remove_active_child(&parent, id)?;
            }
        }
        for id in entry_set {
            let parent = self.registry.raw_state_from(id)?.parent().cloned();
            if let Some(parent) = parent {
                self.registry.set_active_child(&parent, id)?;
            }
        }
        *self.current.borrow_mut() = Some(new_leaf.clone());
        Ok(())
    }
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> fmt::Debug for StateMachine<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("instance", &self.instance)
            .field("status", &self.status.get())
            .field("current", &self.current.borrow())
            .finish_non_exhaustive()
    }
}

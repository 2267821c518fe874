//! Transition definitions.

use crate::core::{Action, ActionArgs, ActionError, Guard, Ident};
use serde::{Deserialize, Serialize};

/// How a transition enters its target's subtree.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EntryPolicy {
    /// Descend through each composite's default (first declared) child.
    Default,
    /// Restore each composite's last active child where one is recorded,
    /// falling back to the default child where none is.
    History,
}

/// A declared transition: on `event`, move from `source` to `target`.
///
/// Candidates for the same `(source, event)` pair are kept in declaration
/// order; resolution picks the first whose guard passes. The transition's
/// own actions run between the exit actions of the states left and the
/// entry actions of the states entered.
///
/// # Example
///
/// ```rust
/// use strata::ident_enum;
/// use strata::model::Transition;
///
/// ident_enum! {
///     enum AtmState { Idle, Loading }
/// }
/// ident_enum! {
///     enum AtmEvent { Connected }
/// }
///
/// let t: Transition<AtmState, AtmEvent, ()> =
///     Transition::new(AtmState::Idle, AtmEvent::Connected, AtmState::Loading)
///         .when(|_event, _ctx| true)
///         .act("transitIdleToLoading", |_args| Ok(()));
///
/// assert_eq!(t.source(), &AtmState::Idle);
/// assert_eq!(t.target(), &AtmState::Loading);
/// ```
pub struct Transition<S: Ident, E: Ident, C: Send + Sync + 'static> {
    source: S,
    event: E,
    target: S,
    entry_policy: EntryPolicy,
    guard: Option<Guard<E, C>>,
    actions: Vec<Action<S, E, C>>,
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> Transition<S, E, C> {
    /// Declare a transition from `source` to `target`, triggered by
    /// `event`.
    pub fn new(source: S, event: E, target: S) -> Self {
        Self {
            source,
            event,
            target,
            entry_policy: EntryPolicy::Default,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Guard the transition with a predicate over `(event, context)`.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&E, &C) -> bool + Send + Sync + 'static,
    {
        self.with_guard(Guard::new(predicate))
    }

    /// Guard the transition with a pre-built [`Guard`].
    pub fn with_guard(mut self, guard: Guard<E, C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Append a transition action built from a name and body.
    pub fn act<F>(self, name: &str, body: F) -> Self
    where
        F: Fn(ActionArgs<'_, S, E, C>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.with_action(Action::new(name, body))
    }

    /// Append a pre-built transition action.
    pub fn with_action(mut self, action: Action<S, E, C>) -> Self {
        self.actions.push(action);
        self
    }

    /// Enter the target's subtree by recorded history instead of default
    /// children.
    pub fn by_history(mut self) -> Self {
        self.entry_policy = EntryPolicy::History;
        self
    }

    /// The declared source state.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The triggering event.
    pub fn event(&self) -> &E {
        &self.event
    }

    /// The declared target state.
    pub fn target(&self) -> &S {
        &self.target
    }

    /// How the target's subtree is entered.
    pub fn entry_policy(&self) -> EntryPolicy {
        self.entry_policy
    }

    /// The guard, if any.
    pub fn guard(&self) -> Option<&Guard<E, C>> {
        self.guard.as_ref()
    }

    /// Transition actions, in declaration order.
    pub fn actions(&self) -> &[Action<S, E, C>] {
        &self.actions
    }

    /// Whether the transition applies to this event occurrence.
    ///
    /// A transition without a guard always passes.
    pub fn passes(&self, event: &E, context: &C) -> bool {
        match &self.guard {
            Some(guard) => guard.check(event, context),
            None => true,
        }
    }
}

//! Deferred action execution.
//!
//! Resolving one event produces an ordered batch of actions that must run
//! only after resolution has fully decided what the transition does. The
//! executor owns a stack of such batches: `begin` pushes an empty batch,
//! `defer` appends to the top one, `execute` pops and runs it.
//!
//! The stack exists because executing an action can itself trigger nested
//! resolution on the same instance (an entry action firing a follow-up
//! event). The nested resolution begins and executes its own batch, which
//! completes before the outer batch resumes: strict LIFO isolation
//! mirroring the call stack, kept as an explicit data structure so depth
//! stays inspectable.

use crate::core::{Action, ActionArgs, Ident, MachineError, MachineResult};
use crate::machine::StateMachine;
use crate::notify::ActionNotice;
use chrono::Utc;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::trace;

struct Deferred<S: Ident, E: Ident, C: Send + Sync + 'static> {
    action: Action<S, E, C>,
    from: Option<S>,
    to: Option<S>,
    event: Option<E>,
    context: Arc<C>,
}

/// Stack of pending action batches for one machine instance.
///
/// Not internally synchronized; one executor belongs to one instance, used
/// by one thread at a time. The machine reference actions receive is
/// supplied at [`execute`](Self::execute) time, since an executor serves
/// exactly one machine.
pub struct ActionExecutor<S: Ident, E: Ident, C: Send + Sync + 'static> {
    stack: RefCell<Vec<Vec<Deferred<S, E, C>>>>,
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> ActionExecutor<S, E, C> {
    /// Create an executor with an empty stack.
    pub fn new() -> Self {
        Self {
            stack: RefCell::new(Vec::new()),
        }
    }

    /// Current number of open batches.
    ///
    /// Zero between externally observed calls; greater during execution,
    /// and greater than one only while nested resolution is in flight.
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    /// Open a new batch.
    ///
    /// Every `begin` must pair with exactly one `execute`. A second
    /// `begin` before that pairing completes opens a nested batch that
    /// will execute first.
    pub fn begin(&self) {
        self.stack.borrow_mut().push(Vec::new());
    }

    /// Append an action to the batch opened by the most recent `begin`.
    pub fn defer(
        &self,
        action: &Action<S, E, C>,
        from: Option<&S>,
        to: Option<&S>,
        event: Option<&E>,
        context: &Arc<C>,
    ) -> MachineResult<()> {
        let mut stack = self.stack.borrow_mut();
        let batch = stack
            .last_mut()
            .ok_or_else(|| MachineError::illegal("defer", "no action batch has been begun"))?;
        batch.push(Deferred {
            action: action.clone(),
            from: from.cloned(),
            to: to.cloned(),
            event: event.cloned(),
            context: Arc::clone(context),
        });
        Ok(())
    }

    /// Pop the top batch and run it in deferral order.
    ///
    /// For each action, an [`ActionNotice`] with its 1-based position and
    /// the batch size is published strictly before the body runs. The
    /// first failing action aborts the remainder of the batch; the batch
    /// is discarded either way, so the stack never retains executed or
    /// half-executed batches.
    pub fn execute(&self, machine: &StateMachine<S, E, C>) -> MachineResult<()> {
        let batch = self
            .stack
            .borrow_mut()
            .pop()
            .ok_or_else(|| MachineError::illegal("execute", "no action batch has been begun"))?;

        let total = batch.len();
        for (index, deferred) in batch.into_iter().enumerate() {
            let position = index + 1;
            machine.notifications().publish_action(&ActionNotice {
                action: &deferred.action,
                from: deferred.from.as_ref(),
                to: deferred.to.as_ref(),
                event: deferred.event.as_ref(),
                context: &deferred.context,
                machine,
                position,
                total,
                at: Utc::now(),
            });
            trace!(
                action = deferred.action.name(),
                position,
                total,
                "executing deferred action"
            );
            deferred
                .action
                .call(ActionArgs {
                    from: deferred.from.as_ref(),
                    to: deferred.to.as_ref(),
                    event: deferred.event.as_ref(),
                    context: &deferred.context,
                    machine,
                })
                .map_err(|source| MachineError::ActionExecution {
                    action: deferred.action.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> Default for ActionExecutor<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActionError;
    use crate::ident_enum;
    use crate::model::ModelBuilder;
    use std::sync::Mutex;

    ident_enum! {
        enum S { A, B }
    }
    ident_enum! {
        enum E { Go }
    }

    fn machine() -> StateMachine<S, E, ()> {
        let model = ModelBuilder::<S, E, ()>::new()
            .state(S::A)
            .state(S::B)
            .build()
            .unwrap();
        StateMachine::new(Arc::new(model), S::A).unwrap()
    }

    fn recording_action(log: &Arc<Mutex<Vec<String>>>, name: &str) -> Action<S, E, ()> {
        let log = Arc::clone(log);
        let tag = name.to_string();
        Action::new(name, move |_| {
            log.lock().unwrap().push(tag.clone());
            Ok(())
        })
    }

    #[test]
    fn defer_without_begin_is_illegal() {
        let executor: ActionExecutor<S, E, ()> = ActionExecutor::new();
        let action = Action::new("noop", |_| Ok(()));
        let err = executor
            .defer(&action, None, None, None, &Arc::new(()))
            .unwrap_err();
        assert!(matches!(err, MachineError::IllegalState { .. }));
    }

    #[test]
    fn execute_runs_in_deferral_order() {
        let machine = machine();
        let executor: ActionExecutor<S, E, ()> = ActionExecutor::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let context = Arc::new(());

        executor.begin();
        for name in ["one", "two", "three"] {
            let action = recording_action(&log, name);
            executor
                .defer(&action, Some(&S::A), Some(&S::B), Some(&E::Go), &context)
                .unwrap();
        }
        executor.execute(&machine).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["one", "two", "three"]);
        assert_eq!(executor.depth(), 0);
    }

    #[test]
    fn progress_notice_precedes_each_body() {
        let machine = machine();
        let executor: ActionExecutor<S, E, ()> = ActionExecutor::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let context = Arc::new(());

        let seen = Arc::clone(&log);
        machine.notifications().subscribe_actions(move |notice| {
            seen.lock()
                .unwrap()
                .push(format!("{}/{}", notice.position, notice.total));
        });

        executor.begin();
        for name in ["a", "b", "c"] {
            let action = recording_action(&log, name);
            executor.defer(&action, None, None, None, &context).unwrap();
        }
        executor.execute(&machine).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["1/3", "a", "2/3", "b", "3/3", "c"]
        );
    }

    #[test]
    fn failure_aborts_the_rest_and_discards_the_batch() {
        let machine = machine();
        let executor: ActionExecutor<S, E, ()> = ActionExecutor::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let context = Arc::new(());

        executor.begin();
        let first = recording_action(&log, "ran");
        executor.defer(&first, None, None, None, &context).unwrap();
        let failing: Action<S, E, ()> = Action::new("blows-up", |_| Err(ActionError::new("boom")));
        executor.defer(&failing, None, None, None, &context).unwrap();
        let never = recording_action(&log, "never");
        executor.defer(&never, None, None, None, &context).unwrap();

        let err = executor.execute(&machine).unwrap_err();
        assert!(matches!(
            err,
            MachineError::ActionExecution { ref action, .. } if action == "blows-up"
        ));
        assert_eq!(*log.lock().unwrap(), vec!["ran"]);
        assert_eq!(executor.depth(), 0);
    }

    #[test]
    fn nested_batches_execute_lifo() {
        let machine = machine();
        let executor: ActionExecutor<S, E, ()> = ActionExecutor::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let context = Arc::new(());

        executor.begin();
        let outer = recording_action(&log, "outer");
        executor.defer(&outer, None, None, None, &context).unwrap();
        assert_eq!(executor.depth(), 1);

        // A nested begin/execute pair, as an action-triggered resolution
        // would produce, drains before the outer batch runs.
        executor.begin();
        assert_eq!(executor.depth(), 2);
        let inner = recording_action(&log, "inner");
        executor.defer(&inner, None, None, None, &context).unwrap();
        executor.execute(&machine).unwrap();
        assert_eq!(executor.depth(), 1);

        executor.execute(&machine).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["inner", "outer"]);
        assert_eq!(executor.depth(), 0);
    }
}

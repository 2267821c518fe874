//! Actions executed on state entry, state exit, and transitions.

use super::error::ActionError;
use super::ident::Ident;
use crate::machine::StateMachine;
use std::fmt;
use std::sync::Arc;

/// Borrowed arguments passed to an action body.
///
/// `from`/`to` depend on the action's role in the batch: for an exit action
/// `from` is the exited state and `to` its parent, for an entry action
/// `from` is the entered state's parent and `to` the entered state, and for
/// a transition action they are the transition's source and target. `event`
/// is absent for batches not caused by an event (start, terminate).
///
/// `machine` is the instance executing the batch; an action may re-enter it
/// synchronously (for example to fire a follow-up event).
pub struct ActionArgs<'a, S: Ident, E: Ident, C: Send + Sync + 'static> {
    /// Where the machine is coming from, per the action's role
    pub from: Option<&'a S>,
    /// Where the machine is going, per the action's role
    pub to: Option<&'a S>,
    /// The event that caused the batch, if any
    pub event: Option<&'a E>,
    /// The caller-supplied context for this call
    pub context: &'a C,
    /// The executing instance
    pub machine: &'a StateMachine<S, E, C>,
}

/// A named unit of work attached to a state or transition.
///
/// The body is a plain closure over [`ActionArgs`]; it returns `Err` to
/// abort the remainder of its batch. Actions are cheap to clone and safe to
/// share across machine instances.
///
/// # Example
///
/// ```rust
/// use strata::core::{Action, ActionError};
/// use strata::ident_enum;
///
/// ident_enum! {
///     enum DoorState { Open, Closed }
/// }
/// ident_enum! {
///     enum DoorEvent { Push }
/// }
///
/// let action: Action<DoorState, DoorEvent, ()> =
///     Action::new("latch", |_args| Ok(()));
/// assert_eq!(action.name(), "latch");
/// ```
pub struct Action<S: Ident, E: Ident, C: Send + Sync + 'static> {
    name: Arc<str>,
    body: ActionBody<S, E, C>,
}

type ActionBody<S, E, C> =
    Arc<dyn Fn(ActionArgs<'_, S, E, C>) -> Result<(), ActionError> + Send + Sync>;

impl<S: Ident, E: Ident, C: Send + Sync + 'static> Action<S, E, C> {
    /// Create an action from a name and a body closure.
    ///
    /// The name is observational only: it appears in action-progress
    /// notifications, logs, and error reports.
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(ActionArgs<'_, S, E, C>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            body: Arc::new(body),
        }
    }

    /// The action's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the action body.
    pub fn call(&self, args: ActionArgs<'_, S, E, C>) -> Result<(), ActionError> {
        (self.body)(args)
    }
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> Clone for Action<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            body: Arc::clone(&self.body),
        }
    }
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> fmt::Debug for Action<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

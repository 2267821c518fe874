//! Notification payloads.
//!
//! Notices are borrowed views over in-flight data: they are constructed,
//! delivered synchronously to every subscriber, and dropped before the
//! operation that caused them continues. Handlers that need to keep data
//! clone the identifier or context values out.

use crate::core::{Action, Ident, MachineError};
use crate::machine::StateMachine;
use chrono::{DateTime, Utc};

/// Which machine-level lifecycle event occurred.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LifecycleKind {
    /// The instance started and reached its initial leaf state.
    Started,
    /// The instance terminated.
    Terminated,
}

impl LifecycleKind {
    /// The kind's display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Terminated => "terminated",
        }
    }
}

/// A machine-level lifecycle notification.
pub struct LifecycleNotice<'a, S: Ident, E: Ident, C: Send + Sync + 'static> {
    /// What happened
    pub kind: LifecycleKind,
    /// The instance it happened to
    pub machine: &'a StateMachine<S, E, C>,
    /// The caller-supplied context of the call
    pub context: &'a C,
    /// When the notice was published
    pub at: DateTime<Utc>,
}

/// Phase of a transition's lifecycle.
pub enum TransitionPhase<'a, S: Ident> {
    /// Resolution is about to run for a fired event.
    Begin,
    /// The transition's batch executed successfully.
    Complete {
        /// The transition's declared target
        target: &'a S,
    },
    /// No declared transition matched the fired event.
    Declined,
    /// An action failed while the batch executed.
    Exception {
        /// The transition's declared target
        target: &'a S,
        /// The failure that aborted the batch
        error: &'a MachineError,
    },
}

impl<S: Ident> TransitionPhase<'_, S> {
    /// The phase's display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Complete { .. } => "complete",
            Self::Declined => "declined",
            Self::Exception { .. } => "exception",
        }
    }
}

/// A per-transition notification.
///
/// `source` is the leaf state that was current when the event fired, which
/// may sit below the transition's declared source in the hierarchy.
pub struct TransitionNotice<'a, S: Ident, E: Ident, C: Send + Sync + 'static> {
    /// Which phase of the transition this notice describes
    pub phase: TransitionPhase<'a, S>,
    /// The leaf state current when the event fired
    pub source: &'a S,
    /// The fired event
    pub event: &'a E,
    /// The caller-supplied context of the call
    pub context: &'a C,
    /// The instance processing the event
    pub machine: &'a StateMachine<S, E, C>,
    /// When the notice was published
    pub at: DateTime<Utc>,
}

/// A per-action progress notification, published strictly before the
/// action body runs.
pub struct ActionNotice<'a, S: Ident, E: Ident, C: Send + Sync + 'static> {
    /// The action about to run
    pub action: &'a Action<S, E, C>,
    /// Where the machine is coming from, per the action's role
    pub from: Option<&'a S>,
    /// Where the machine is going, per the action's role
    pub to: Option<&'a S>,
    /// The event that caused the batch, if any
    pub event: Option<&'a E>,
    /// The caller-supplied context of the call
    pub context: &'a C,
    /// The instance executing the batch
    pub machine: &'a StateMachine<S, E, C>,
    /// 1-based position of the action within its batch
    pub position: usize,
    /// Number of actions in the batch
    pub total: usize,
    /// When the notice was published
    pub at: DateTime<Utc>,
}

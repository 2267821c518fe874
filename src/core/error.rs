//! Runtime error types for the execution engine.

use super::status::MachineStatus;
use thiserror::Error;

/// Errors raised by live machine instances.
///
/// Declined transitions are deliberately absent: a declined event is an
/// observable outcome, published as a notification and returned as
/// [`FireOutcome::Declined`](crate::machine::FireOutcome::Declined), never
/// an error.
#[derive(Debug, Error)]
pub enum MachineError {
    /// The operation is invalid for the instance's current situation.
    #[error("{operation} not allowed: {detail}")]
    IllegalState {
        /// The rejected operation
        operation: &'static str,
        /// Why it was rejected
        detail: String,
    },

    /// An identifier does not name a declared state.
    #[error("unknown state '{0}'")]
    UnknownState(String),

    /// A child/parent pairing contradicts the declared hierarchy.
    #[error("'{child}' is not a declared child of '{parent}'")]
    InvalidHierarchy {
        /// The composite named as parent
        parent: String,
        /// The state asserted to be its child
        child: String,
    },

    /// An action body failed during batch execution.
    ///
    /// Remaining actions in the batch were skipped and the batch was
    /// discarded.
    #[error("action '{action}' failed")]
    ActionExecution {
        /// Name of the failing action
        action: String,
        /// The error the action body returned
        #[source]
        source: ActionError,
    },
}

impl MachineError {
    /// Build an [`MachineError::IllegalState`] with the rejected operation
    /// and a human-readable reason.
    pub fn illegal(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::IllegalState {
            operation,
            detail: detail.into(),
        }
    }

    /// Build an [`MachineError::IllegalState`] for an operation rejected by
    /// the status machine.
    pub fn illegal_status(operation: &'static str, status: MachineStatus) -> Self {
        Self::IllegalState {
            operation,
            detail: format!("machine is {status}"),
        }
    }
}

/// Error returned by an action body.
///
/// Carries a message and an optional underlying error. Action failures
/// abort the rest of their batch and surface to the caller of
/// `start`/`fire`/`terminate` as [`MachineError::ActionExecution`].
///
/// # Example
///
/// ```rust
/// use strata::core::ActionError;
///
/// let err = ActionError::new("card reader offline");
/// assert_eq!(err.message(), "card reader offline");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ActionError {
    /// Create an action error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an action error wrapping an underlying error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type alias for machine operations.
pub type MachineResult<T> = Result<T, MachineError>;

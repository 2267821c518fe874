//! Model assembly errors.

use thiserror::Error;

/// Errors detected while assembling a [`StateModel`](super::StateModel).
///
/// All validation happens in [`ModelBuilder::build`](super::ModelBuilder::build);
/// the fluent declaration methods never fail.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model declares no states")]
    EmptyModel,

    #[error("state '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("parent '{parent}' of '{child}' is not declared before it")]
    UnknownParent { child: String, parent: String },

    #[error("state '{0}' is not declared")]
    UndeclaredState(String),

    #[error("transition on '{event}' references undeclared state '{state}'")]
    UndeclaredTransitionEndpoint { event: String, state: String },
}

//! Read-only model traversal.

use super::raw::RawState;
use super::transition::Transition;
use crate::core::Ident;

/// Visitor over a finalized model.
///
/// [`StateModel::accept`](super::StateModel::accept) walks every state and
/// then every transition, both in declaration order. The traversal exposes
/// everything an exporter needs to regenerate an external declarative
/// representation; the engine itself performs no serialization.
pub trait ModelVisitor<S: Ident, E: Ident, C: Send + Sync + 'static> {
    /// Called once per declared state.
    fn visit_state(&mut self, state: &RawState<S, E, C>);

    /// Called once per declared transition.
    fn visit_transition(&mut self, transition: &Transition<S, E, C>);
}

//! The immutable machine model.
//!
//! A [`StateModel`] is the finalized description of a machine: an indexed
//! table of immutable [`RawState`] definitions plus a transition table
//! mapping `(source, event)` to ordered candidate [`Transition`]s. Models
//! are assembled once with [`ModelBuilder`], wrapped in an `Arc`, and
//! shared read-only across any number of live instances.

mod build;
mod error;
mod raw;
mod transition;
mod visit;

pub use build::ModelBuilder;
pub use error::ModelError;
pub use raw::RawState;
pub use transition::{EntryPolicy, Transition};
pub use visit::ModelVisitor;

use crate::core::Ident;
use std::collections::HashMap;

/// Finalized, immutable model: state hierarchy plus transition table.
pub struct StateModel<S: Ident, E: Ident, C: Send + Sync + 'static> {
    states: HashMap<S, RawState<S, E, C>>,
    order: Vec<S>,
    transitions: Vec<Transition<S, E, C>>,
    by_trigger: HashMap<(S, E), Vec<usize>>,
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> StateModel<S, E, C> {
    pub(crate) fn assemble(
        states: HashMap<S, RawState<S, E, C>>,
        order: Vec<S>,
        transitions: Vec<Transition<S, E, C>>,
    ) -> Self {
        let mut by_trigger: HashMap<(S, E), Vec<usize>> = HashMap::new();
        for (index, transition) in transitions.iter().enumerate() {
            by_trigger
                .entry((transition.source().clone(), transition.event().clone()))
                .or_default()
                .push(index);
        }
        Self {
            states,
            order,
            transitions,
            by_trigger,
        }
    }

    /// Look up a state definition.
    pub fn state(&self, id: &S) -> Option<&RawState<S, E, C>> {
        self.states.get(id)
    }

    /// Whether `id` names a declared state.
    pub fn contains(&self, id: &S) -> bool {
        self.states.contains_key(id)
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the model declares no states. `ModelBuilder` never produces
    /// one, so this is only `true` for models still being assembled.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All states, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &RawState<S, E, C>> {
        self.order.iter().filter_map(|id| self.states.get(id))
    }

    /// All transitions, in declaration order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<S, E, C>> {
        self.transitions.iter()
    }

    /// Candidate transitions for `(source, event)`, in declaration order.
    pub fn candidates(&self, source: &S, event: &E) -> impl Iterator<Item = &Transition<S, E, C>> {
        self.by_trigger
            .get(&(source.clone(), event.clone()))
            .map(|indexes| indexes.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|index| &self.transitions[*index])
    }

    /// The ancestor chain of `id`, from the root down to and including
    /// `id`.
    pub fn path_from_root(&self, id: &S) -> Option<Vec<S>> {
        let mut chain = Vec::new();
        let mut cursor = Some(id.clone());
        while let Some(current) = cursor {
            let raw = self.states.get(&current)?;
            cursor = raw.parent().cloned();
            chain.push(current);
        }
        chain.reverse();
        Some(chain)
    }

    /// The nearest state that is `a` or an ancestor of `a`, and `b` or an
    /// ancestor of `b`. `None` when the two live under different roots.
    pub fn least_common_ancestor(&self, a: &S, b: &S) -> Option<S> {
        let mut lineage = std::collections::HashSet::new();
        let mut cursor = Some(a.clone());
        while let Some(current) = cursor {
            cursor = self.states.get(&current)?.parent().cloned();
            lineage.insert(current);
        }
        let mut cursor = Some(b.clone());
        while let Some(current) = cursor {
            if lineage.contains(&current) {
                return Some(current);
            }
            cursor = self.states.get(&current)?.parent().cloned();
        }
        None
    }

    /// Walk every state and then every transition, in declaration order.
    pub fn accept(&self, visitor: &mut impl ModelVisitor<S, E, C>) {
        for state in self.states() {
            visitor.visit_state(state);
        }
        for transition in self.transitions() {
            visitor.visit_transition(transition);
        }
    }
}

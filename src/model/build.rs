//! Assembly of immutable state models.

use super::error::ModelError;
use super::raw::RawState;
use super::transition::Transition;
use super::StateModel;
use crate::core::{Action, ActionArgs, ActionError, Ident};
use std::collections::{HashMap, HashSet};

/// Assembles and validates a [`StateModel`].
///
/// Declaration methods are fluent and never fail; [`build`](Self::build)
/// performs all validation. Parents must be declared before their children,
/// which keeps the hierarchy acyclic by construction.
///
/// # Example
///
/// ```rust
/// use strata::ident_enum;
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
/// assert!(model.state(&AtmState::Idle).is_some());
/// ```
pub struct ModelBuilder<S: Ident, E: Ident, C: Send + Sync + 'static> {
    declarations: Vec<(S, Option<S>)>,
    entry_actions: Vec<(S, Action<S, E, C>)>,
    exit_actions: Vec<(S, Action<S, E, C>)>,
    no_history: Vec<S>,
    transitions: Vec<Transition<S, E, C>>,
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> ModelBuilder<S, E, C> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            no_history: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Declare a top-level state.
    pub fn state(mut self, id: S) -> Self {
        self.declarations.push((id, None));
        self
    }

    /// Declare a state nested under `parent`.
    ///
    /// The parent must have been declared by an earlier `state`/`child`
    /// call; `build` rejects forward references.
    pub fn child(mut self, id: S, parent: S) -> Self {
        self.declarations.push((id, Some(parent)));
        self
    }

    /// Attach an entry action to a declared state.
    pub fn entry_action(mut self, id: S, action: Action<S, E, C>) -> Self {
        self.entry_actions.push((id, action));
        self
    }

    /// Attach an entry action built from a name and body.
    pub fn on_entry<F>(self, id: S, name: &str, body: F) -> Self
    where
        F: Fn(ActionArgs<'_, S, E, C>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.entry_action(id, Action::new(name, body))
    }

    /// Attach an exit action to a declared state.
    pub fn exit_action(mut self, id: S, action: Action<S, E, C>) -> Self {
        self.exit_actions.push((id, action));
        self
    }

    /// Attach an exit action built from a name and body.
    pub fn on_exit<F>(self, id: S, name: &str, body: F) -> Self
    where
        F: Fn(ActionArgs<'_, S, E, C>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.exit_action(id, Action::new(name, body))
    }

    /// Opt a composite out of last-active-child history tracking.
    pub fn without_history(mut self, id: S) -> Self {
        self.no_history.push(id);
        self
    }

    /// Declare a transition.
    pub fn transition(mut self, transition: Transition<S, E, C>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Validate the declarations and assemble the immutable model.
    pub fn build(self) -> Result<StateModel<S, E, C>, ModelError> {
        if self.declarations.is_empty() {
            return Err(ModelError::EmptyModel);
        }

        let mut states: HashMap<S, RawState<S, E, C>> = HashMap::new();
        let mut order: Vec<S> = Vec::new();
        let mut seen: HashSet<S> = HashSet::new();

        for (id, parent) in self.declarations {
            if !seen.insert(id.clone()) {
                return Err(ModelError::DuplicateState(id.name().to_string()));
            }
            if let Some(parent) = &parent {
                // Declaration order doubles as a topological order, so a
                // parent that is not yet known is either missing or would
                // close a cycle.
                let known = states
                    .get_mut(parent)
                    .ok_or_else(|| ModelError::UnknownParent {
                        child: id.name().to_string(),
                        parent: parent.name().to_string(),
                    })?;
                known.push_child(id.clone());
            }
            order.push(id.clone());
            states.insert(id.clone(), RawState::new(id, parent));
        }

        for (id, action) in self.entry_actions {
            let state = states
                .get_mut(&id)
                .ok_or_else(|| ModelError::UndeclaredState(id.name().to_string()))?;
            state.push_entry_action(action);
        }
        for (id, action) in self.exit_actions {
            let state = states
                .get_mut(&id)
                .ok_or_else(|| ModelError::UndeclaredState(id.name().to_string()))?;
            state.push_exit_action(action);
        }
        for id in self.no_history {
            let state = states
                .get_mut(&id)
                .ok_or_else(|| ModelError::UndeclaredState(id.name().to_string()))?;
            state.disable_history();
        }

        for transition in &self.transitions {
            for endpoint in [transition.source(), transition.target()] {
                if !states.contains_key(endpoint) {
                    return Err(ModelError::UndeclaredTransitionEndpoint {
                        event: transition.event().name().to_string(),
                        state: endpoint.name().to_string(),
                    });
                }
            }
        }

        Ok(StateModel::assemble(states, order, self.transitions))
    }
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> Default for ModelBuilder<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

//! Immutable state definitions.

use crate::core::{Action, Ident};

/// Immutable definition of one state in the model.
///
/// A raw state records its place in the hierarchy (optional parent, ordered
/// children) and the actions run when the state is entered or exited. Raw
/// states are built once and shared read-only across every live instance of
/// the model; per-instance data (which child is active, history) lives in
/// the instance's registry instead.
pub struct RawState<S: Ident, E: Ident, C: Send + Sync + 'static> {
    id: S,
    parent: Option<S>,
    children: Vec<S>,
    entry_actions: Vec<Action<S, E, C>>,
    exit_actions: Vec<Action<S, E, C>>,
    history: bool,
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> RawState<S, E, C> {
    pub(crate) fn new(id: S, parent: Option<S>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            history: true,
        }
    }

    pub(crate) fn push_child(&mut self, child: S) {
        self.children.push(child);
    }

    pub(crate) fn push_entry_action(&mut self, action: Action<S, E, C>) {
        self.entry_actions.push(action);
    }

    pub(crate) fn push_exit_action(&mut self, action: Action<S, E, C>) {
        self.exit_actions.push(action);
    }

    pub(crate) fn disable_history(&mut self) {
        self.history = false;
    }

    /// The state's identifier.
    pub fn id(&self) -> &S {
        &self.id
    }

    /// The parent state, if this state is nested.
    pub fn parent(&self) -> Option<&S> {
        self.parent.as_ref()
    }

    /// Declared children, in declaration order.
    pub fn children(&self) -> &[S] {
        &self.children
    }

    /// Whether this state has children.
    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    /// The child entered by default, i.e. the first declared child.
    pub fn default_child(&self) -> Option<&S> {
        self.children.first()
    }

    /// Actions run when the state is entered, in declaration order.
    pub fn entry_actions(&self) -> &[Action<S, E, C>] {
        &self.entry_actions
    }

    /// Actions run when the state is exited, in declaration order.
    pub fn exit_actions(&self) -> &[Action<S, E, C>] {
        &self.exit_actions
    }

    /// Whether exits from this composite record last-active-child history.
    pub fn tracks_history(&self) -> bool {
        self.history
    }
}

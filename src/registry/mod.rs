//! Per-instance hierarchical state tracking.
//!
//! The registry records, for one live instance, which children of each
//! composite are active and which child was last active (history). It also
//! resolves immutable state definitions by identifier. The model itself is
//! shared and read-only; everything mutable here is exclusively owned by
//! one instance.

use crate::core::{Ident, MachineError, MachineResult};
use crate::model::{RawState, StateModel};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Active-children and last-active-child bookkeeping for one instance.
///
/// Not internally synchronized; a registry belongs to exactly one machine
/// instance and is used from one thread at a time.
pub struct StateRegistry<S: Ident, E: Ident, C: Send + Sync + 'static> {
    model: Arc<StateModel<S, E, C>>,
    active: RefCell<HashMap<S, Vec<S>>>,
    history: RefCell<HashMap<S, S>>,
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> StateRegistry<S, E, C> {
    /// Create an empty registry over a shared model.
    pub fn new(model: Arc<StateModel<S, E, C>>) -> Self {
        Self {
            model,
            active: RefCell::new(HashMap::new()),
            history: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve the immutable definition of `id`.
    pub fn raw_state_from(&self, id: &S) -> MachineResult<&RawState<S, E, C>> {
        self.model
            .state(id)
            .ok_or_else(|| MachineError::UnknownState(id.name().to_string()))
    }

    /// The active children of `parent`, in activation order. Empty when
    /// none are active.
    pub fn active_children_of(&self, parent: &S) -> Vec<S> {
        self.active
            .borrow()
            .get(parent)
            .cloned()
            .unwrap_or_default()
    }

    /// Mark `child` active under `parent`.
    pub fn set_active_child(&self, parent: &S, child: &S) -> MachineResult<()> {
        self.assert_child_of(parent, child)?;
        let mut active = self.active.borrow_mut();
        let children = active.entry(parent.clone()).or_default();
        if !children.contains(child) {
            children.push(child.clone());
        }
        Ok(())
    }

    /// Mark `child` inactive under `parent`, recording it as the
    /// composite's last active child unless the composite opts out of
    /// history tracking.
    pub fn remove_active_child(&self, parent: &S, child: &S) -> MachineResult<()> {
        self.assert_child_of(parent, child)?;
        if let Some(children) = self.active.borrow_mut().get_mut(parent) {
            children.retain(|c| c != child);
        }
        if self.raw_state_from(parent)?.tracks_history() {
            self.history
                .borrow_mut()
                .insert(parent.clone(), child.clone());
        }
        Ok(())
    }

    /// Drop every active child of `parent` without touching history.
    pub fn clear_active_children(&self, parent: &S) -> MachineResult<()> {
        self.raw_state_from(parent)?;
        self.active.borrow_mut().remove(parent);
        Ok(())
    }

    /// The last active child recorded for `parent`, if any.
    pub fn last_active_child_of(&self, parent: &S) -> MachineResult<Option<S>> {
        self.raw_state_from(parent)?;
        Ok(self.history.borrow().get(parent).cloned())
    }

    /// Overwrite the history record for `parent`.
    pub fn set_last_active_child(&self, parent: &S, child: &S) -> MachineResult<()> {
        self.assert_child_of(parent, child)?;
        self.history
            .borrow_mut()
            .insert(parent.clone(), child.clone());
        Ok(())
    }

    fn assert_child_of(&self, parent: &S, child: &S) -> MachineResult<()> {
        let raw = self.raw_state_from(child)?;
        self.raw_state_from(parent)?;
        if raw.parent() != Some(parent) {
            return Err(MachineError::InvalidHierarchy {
                parent: parent.name().to_string(),
                child: child.name().to_string(),
            });
        }
        Ok(())
    }
}

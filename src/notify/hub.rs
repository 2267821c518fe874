//! Typed publish/subscribe registry.

use super::notice::{ActionNotice, LifecycleNotice, TransitionNotice};
use crate::core::Ident;
use std::cell::RefCell;
use std::sync::Arc;
use uuid::Uuid;

/// Handle returned by a subscribe call, used to unsubscribe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

type LifecycleHandler<S, E, C> = Arc<dyn Fn(&LifecycleNotice<'_, S, E, C>) + Send + Sync>;
type TransitionHandler<S, E, C> = Arc<dyn Fn(&TransitionNotice<'_, S, E, C>) + Send + Sync>;
type ActionHandler<S, E, C> = Arc<dyn Fn(&ActionNotice<'_, S, E, C>) + Send + Sync>;

/// Typed notification channels for one machine instance.
///
/// One channel per notification kind; a subscriber registers for exactly
/// the kind it cares about. Delivery is synchronous and in subscription
/// order within a channel. The subscriber list is snapshotted per publish,
/// so handlers may subscribe or unsubscribe from inside a delivery without
/// affecting the one in flight.
pub struct NotificationHub<S: Ident, E: Ident, C: Send + Sync + 'static> {
    lifecycle: RefCell<Vec<(SubscriptionId, LifecycleHandler<S, E, C>)>>,
    transition: RefCell<Vec<(SubscriptionId, TransitionHandler<S, E, C>)>>,
    action: RefCell<Vec<(SubscriptionId, ActionHandler<S, E, C>)>>,
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> NotificationHub<S, E, C> {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            lifecycle: RefCell::new(Vec::new()),
            transition: RefCell::new(Vec::new()),
            action: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe to lifecycle notices (started, terminated).
    pub fn subscribe_lifecycle<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&LifecycleNotice<'_, S, E, C>) + Send + Sync + 'static,
    {
        let id = SubscriptionId::fresh();
        self.lifecycle.borrow_mut().push((id, Arc::new(handler)));
        id
    }

    /// Subscribe to transition notices (begin, complete, declined,
    /// exception).
    pub fn subscribe_transitions<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&TransitionNotice<'_, S, E, C>) + Send + Sync + 'static,
    {
        let id = SubscriptionId::fresh();
        self.transition.borrow_mut().push((id, Arc::new(handler)));
        id
    }

    /// Subscribe to per-action progress notices.
    pub fn subscribe_actions<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ActionNotice<'_, S, E, C>) + Send + Sync + 'static,
    {
        let id = SubscriptionId::fresh();
        self.action.borrow_mut().push((id, Arc::new(handler)));
        id
    }

    /// Remove a subscription from whichever channel holds it.
    ///
    /// Returns `false` when the id is not (or no longer) registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.lifecycle.borrow_mut().retain(|(sid, _)| {
            let keep = *sid != id;
            removed |= !keep;
            keep
        });
        self.transition.borrow_mut().retain(|(sid, _)| {
            let keep = *sid != id;
            removed |= !keep;
            keep
        });
        self.action.borrow_mut().retain(|(sid, _)| {
            let keep = *sid != id;
            removed |= !keep;
            keep
        });
        removed
    }

    pub(crate) fn publish_lifecycle(&self, notice: &LifecycleNotice<'_, S, E, C>) {
        let handlers: Vec<_> = self
            .lifecycle
            .borrow()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler(notice);
        }
    }

    pub(crate) fn publish_transition(&self, notice: &TransitionNotice<'_, S, E, C>) {
        let handlers: Vec<_> = self
            .transition
            .borrow()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler(notice);
        }
    }

    pub(crate) fn publish_action(&self, notice: &ActionNotice<'_, S, E, C>) {
        let handlers: Vec<_> = self
            .action
            .borrow()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler(notice);
        }
    }
}

impl<S: Ident, E: Ident, C: Send + Sync + 'static> Default for NotificationHub<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions evaluated while resolving an event.
//! They decide whether a candidate transition applies without side effects;
//! a guard that declines simply passes resolution to the next candidate.

use super::ident::Ident;
use std::sync::Arc;

/// Pure predicate over `(event, context)` that determines whether a
/// candidate transition applies.
///
/// Candidates for one `(source, event)` pair are evaluated in declaration
/// order; the first whose guard passes wins. A transition without a guard
/// always passes.
///
/// # Example
///
/// ```rust
/// use strata::core::Guard;
/// use strata::ident_enum;
///
/// ident_enum! {
///     enum CashEvent { Withdraw }
/// }
///
/// // Context carries the requested amount; only small withdrawals pass.
/// let small_only: Guard<CashEvent, u32> = Guard::new(|_event, amount| *amount <= 200);
///
/// assert!(small_only.check(&CashEvent::Withdraw, &50));
/// assert!(!small_only.check(&CashEvent::Withdraw, &500));
/// ```
pub struct Guard<E: Ident, C> {
    predicate: Arc<dyn Fn(&E, &C) -> bool + Send + Sync>,
}

impl<E: Ident, C> Guard<E, C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects; it may
    /// run any number of times while an event is resolved.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&E, &C) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the guard against an event and its call context.
    pub fn check(&self, event: &E, context: &C) -> bool {
        (self.predicate)(event, context)
    }
}

impl<E: Ident, C> Clone for Guard<E, C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

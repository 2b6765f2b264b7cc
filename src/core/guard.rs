//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the subject entity. A transition
//! consults its guard before the handler runs; a rejected guard leaves the
//! entity untouched.

use std::sync::Arc;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use entity_states::core::Guard;
///
/// struct Invoice {
///     total_cents: u64,
///     approved: bool,
/// }
///
/// let payable = Guard::new(|invoice: &Invoice| invoice.approved && invoice.total_cents > 0);
///
/// assert!(payable.check(&Invoice { total_cents: 1200, approved: true }));
/// assert!(!payable.check(&Invoice { total_cents: 1200, approved: false }));
/// ```
pub struct Guard<E> {
    predicate: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Guard<E> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// A guard that always passes.
    pub fn always() -> Self
    where
        E: 'static,
    {
        Self::new(|_| true)
    }

    /// Check if the guard allows the transition for this entity.
    pub fn check(&self, entity: &E) -> bool {
        (self.predicate)(entity)
    }

    /// Combine two guards; both must pass.
    pub fn and(self, other: Guard<E>) -> Self
    where
        E: 'static,
    {
        Self::new(move |entity| self.check(entity) && other.check(entity))
    }
}

impl<E> Clone for Guard<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> std::fmt::Debug for Guard<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

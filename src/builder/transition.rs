//! Builder for closure-based transitions.

use crate::builder::error::BuildError;
use crate::core::Guard;
use crate::effects::{Transition, TransitionError};
use std::fmt;
use std::sync::Arc;

/// Type alias for transition handlers.
type Handler<E, O> = Arc<dyn Fn(&mut E) -> Result<O, TransitionError> + Send + Sync>;

/// Builder for transitions assembled from closures.
///
/// Useful for one-off operations that do not warrant their own type. The
/// built transition needs no services.
///
/// # Example
///
/// ```rust
/// use entity_states::builder::TransitionBuilder;
///
/// struct Counter {
///     value: u32,
/// }
///
/// let bump = TransitionBuilder::new()
///     .named("bump")
///     .when(|c: &Counter| c.value < 10)
///     .handle(|c: &mut Counter| {
///         c.value += 1;
///         Ok(c.value)
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(bump.name_str(), "bump");
/// ```
pub struct TransitionBuilder<E, O> {
    name: Option<String>,
    guard: Option<Guard<E>>,
    handler: Option<Handler<E, O>>,
}

impl<E: 'static, O> TransitionBuilder<E, O> {
    pub fn new() -> Self {
        Self {
            name: None,
            guard: None,
            handler: None,
        }
    }

    /// Name used in errors and logs (optional).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a guard (optional). Repeated guards must all pass.
    pub fn guard(mut self, guard: Guard<E>) -> Self {
        self.guard = Some(match self.guard.take() {
            Some(existing) => existing.and(guard),
            None => guard,
        });
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Set the handler (required).
    pub fn handle<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut E) -> Result<O, TransitionError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<FnTransition<E, O>, BuildError> {
        let handler = self.handler.ok_or(BuildError::MissingHandler)?;
        Ok(FnTransition {
            name: self.name.unwrap_or_else(|| "anonymous".to_string()),
            guard: self.guard.unwrap_or_else(Guard::always),
            handler,
        })
    }
}

impl<E: 'static, O> FnTransition<E, O> {
    pub(super) fn from_parts<F>(name: impl Into<String>, guard: Guard<E>, handler: F) -> Self
    where
        F: Fn(&mut E) -> Result<O, TransitionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            guard,
            handler: Arc::new(handler),
        }
    }
}

impl<E: 'static, O> Default for TransitionBuilder<E, O> {
    fn default() -> Self {
        Self::new()
    }
}

/// A transition built by [`TransitionBuilder`].
///
/// Cheap to clone; clone it to run the same transition more than once.
pub struct FnTransition<E, O> {
    name: String,
    guard: Guard<E>,
    handler: Handler<E, O>,
}

impl<E, O> FnTransition<E, O> {
    pub fn name_str(&self) -> &str {
        &self.name
    }
}

impl<E, O> Clone for FnTransition<E, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            guard: self.guard.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<E, O> fmt::Debug for FnTransition<E, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<E, O> Transition<E> for FnTransition<E, O> {
    type Output = O;
    type Deps<'s> = ();

    fn name(&self) -> String {
        self.name.clone()
    }

    fn can_transition(&self, entity: &E) -> bool {
        self.guard.check(entity)
    }

    fn handle(self, entity: &mut E, _: ()) -> Result<O, TransitionError> {
        (self.handler)(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{execute, Services};
    use crate::entity::{HasStates, StateFields};

    #[derive(Debug, Default)]
    struct Counter {
        value: u32,
    }

    impl HasStates for Counter {
        fn state_fields() -> StateFields<Self> {
            StateFields::new()
        }
    }

    #[test]
    fn builder_requires_a_handler() {
        let result = TransitionBuilder::<Counter, ()>::new()
            .named("noop")
            .build();

        assert!(matches!(result, Err(BuildError::MissingHandler)));
    }

    #[test]
    fn unnamed_transitions_get_a_placeholder() {
        let transition = TransitionBuilder::<Counter, ()>::new()
            .handle(|_| Ok(()))
            .build()
            .unwrap();

        assert_eq!(transition.name(), "anonymous");
        assert!(transition.can_transition(&Counter::default()));
    }

    #[test]
    fn guards_accumulate() {
        let transition = TransitionBuilder::<Counter, u32>::new()
            .when(|c| c.value > 1)
            .when(|c| c.value < 5)
            .handle(|c| Ok(c.value))
            .build()
            .unwrap();

        assert!(!transition.can_transition(&Counter { value: 1 }));
        assert!(transition.can_transition(&Counter { value: 3 }));
        assert!(!transition.can_transition(&Counter { value: 5 }));
    }

    #[test]
    fn built_transition_runs_through_executor() {
        let double = TransitionBuilder::new()
            .named("double")
            .when(|c: &Counter| c.value > 0)
            .handle(|c: &mut Counter| {
                c.value *= 2;
                Ok(c.value)
            })
            .build()
            .unwrap();

        let mut counter = Counter { value: 3 };
        let services = Services::new();
        assert_eq!(execute(&mut counter, double.clone(), &services).unwrap(), 6);
        assert_eq!(execute(&mut counter, double.clone(), &services).unwrap(), 12);

        let mut zero = Counter::default();
        let err = execute(&mut zero, double, &services).unwrap_err();
        match err {
            TransitionError::CannotTransition { transition, .. } => {
                assert_eq!(transition, "double")
            }
            other => panic!("Expected CannotTransition, got {other:?}"),
        }
    }
}

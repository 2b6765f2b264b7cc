//! Transition trait and errors.

use crate::effects::services::FromServices;
use crate::registry::StateError;

/// A guarded, parameterized operation on an entity.
///
/// A transition is a short-lived value: built for one invocation, checked
/// with [`can_transition`](Transition::can_transition), then consumed by
/// [`handle`](Transition::handle). Values the handler needs from the
/// environment are declared through `Deps` and supplied by the executor.
///
/// # Example
///
/// ```rust
/// use entity_states::effects::{Transition, TransitionError};
///
/// struct Invoice {
///     paid_cents: u64,
///     total_cents: u64,
/// }
///
/// struct RecordPayment {
///     cents: u64,
/// }
///
/// impl Transition<Invoice> for RecordPayment {
///     type Output = u64;
///     type Deps<'s> = ();
///
///     fn can_transition(&self, invoice: &Invoice) -> bool {
///         invoice.paid_cents + self.cents <= invoice.total_cents
///     }
///
///     fn handle(self, invoice: &mut Invoice, _: ()) -> Result<u64, TransitionError> {
///         invoice.paid_cents += self.cents;
///         Ok(invoice.total_cents - invoice.paid_cents)
///     }
/// }
/// ```
pub trait Transition<E>: Sized {
    /// What the handler returns, conventionally the mutated entity or a
    /// summary of the change.
    type Output;

    /// Environment values the handler requires.
    type Deps<'s>: FromServices<'s>;

    /// Name used in errors and logs.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Guard evaluated before the handler. Defaults to `true`.
    fn can_transition(&self, _entity: &E) -> bool {
        true
    }

    /// Apply the transition.
    ///
    /// Mutations made before an error are not rolled back.
    fn handle(
        self,
        entity: &mut E,
        deps: Self::Deps<'_>,
    ) -> Result<Self::Output, TransitionError>;
}

/// A transition built from the entity plus caller-supplied arguments.
pub trait FromEntity<E>: Transition<E> {
    type Args;

    fn construct(entity: &E, args: Self::Args) -> Self;
}

/// Errors that can occur during transitions
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// The guard rejected the transition; the entity is unchanged
    #[error("Transition '{transition}' is not allowed for {entity}")]
    CannotTransition { transition: String, entity: String },

    /// A required environment value was missing
    #[error("Transition '{transition}' requires '{dependency}', which was not provided")]
    DependencyResolution {
        transition: String,
        dependency: &'static str,
    },

    #[error(transparent)]
    State(#[from] StateError),

    #[error("Transition handler failed: {0}")]
    HandlerFailed(String),
}

impl TransitionError {
    /// Wrap a handler or persistence failure.
    pub fn handler(error: impl std::fmt::Display) -> Self {
        Self::HandlerFailed(error.to_string())
    }

    /// True when a guard rejected the transition. This is the one expected,
    /// recoverable failure; callers may re-check and retry explicitly.
    pub fn is_guard_failure(&self) -> bool {
        matches!(self, Self::CannotTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: i32,
    }

    struct Increment;

    impl Transition<Counter> for Increment {
        type Output = i32;
        type Deps<'s> = ();

        fn handle(self, counter: &mut Counter, _: ()) -> Result<i32, TransitionError> {
            counter.value += 1;
            Ok(counter.value)
        }
    }

    #[test]
    fn guard_defaults_to_true() {
        assert!(Increment.can_transition(&Counter { value: 0 }));
    }

    #[test]
    fn name_defaults_to_type_name() {
        assert!(Increment.name().ends_with("Increment"));
    }

    #[test]
    fn guard_failures_are_distinguishable() {
        let guard = TransitionError::CannotTransition {
            transition: "Increment".to_string(),
            entity: "Counter".to_string(),
        };
        let state: TransitionError = StateError::NoStatesDeclared { family: "Empty" }.into();
        let handler = TransitionError::handler("disk full");

        assert!(guard.is_guard_failure());
        assert!(!state.is_guard_failure());
        assert!(!handler.is_guard_failure());
        assert_eq!(handler.to_string(), "Transition handler failed: disk full");
    }

    #[test]
    fn state_errors_pass_through_unchanged() {
        let err: TransitionError = StateError::NoStatesDeclared { family: "Empty" }.into();
        assert_eq!(err.to_string(), "No states declared for family 'Empty'");
    }
}

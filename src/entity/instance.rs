//! States bound to the entity that holds them.

use crate::core::{State, StateRef};
use crate::registry::StateError;
use std::fmt;
use std::ops::Deref;

/// A concrete state together with a reference to its owning entity.
///
/// Derefs to the state, so every [`State`] query is available. Equality is
/// by state type and ignores the entity.
pub struct BoundState<'e, S, E> {
    state: S,
    entity: &'e E,
}

impl<'e, S: State, E> BoundState<'e, S, E> {
    pub fn new(state: S, entity: &'e E) -> Self {
        Self { state, entity }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn entity(&self) -> &'e E {
        self.entity
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S, E> Deref for BoundState<'_, S, E> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}

impl<S: Clone, E> Clone for BoundState<'_, S, E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            entity: self.entity,
        }
    }
}

impl<'b, S: State, E, F> PartialEq<BoundState<'b, S, F>> for BoundState<'_, S, E> {
    fn eq(&self, other: &BoundState<'b, S, F>) -> bool {
        self.state.type_name() == other.state.type_name()
    }
}

impl<S: State, E> fmt::Debug for BoundState<'_, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundState").field(&self.state).finish()
    }
}

impl<S: State, E> fmt::Display for BoundState<'_, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.state.short_name())
    }
}

/// Resolve `identifier` in family `S` and bind the result to `entity`.
pub fn make<'e, 'a, S: State, E>(
    identifier: impl Into<StateRef<'a, S>>,
    entity: &'e E,
) -> Result<BoundState<'e, S, E>, StateError> {
    Ok(BoundState::new(S::resolve(identifier)?, entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Review {
            Draft,
            Submitted,
            Approved,
        }
        final: [Approved]
    }

    struct Article;
    struct Comment;

    #[test]
    fn make_binds_resolved_state() {
        let article = Article;
        let bound = make::<Review, _>("submitted", &article).unwrap();
        assert_eq!(bound.state(), &Review::Submitted);
        assert_eq!(bound.to_string(), "submitted");
        assert!(std::ptr::eq(bound.entity(), &article));
    }

    #[test]
    fn make_rejects_unknown_identifiers() {
        let err = make::<Review, _>("published", &Article).unwrap_err();
        assert_eq!(
            err,
            StateError::Unresolved {
                identifier: "published".to_string(),
                family: "Review",
            }
        );
    }

    #[test]
    fn equality_ignores_the_entity() {
        let on_article = make::<Review, _>(Review::Draft, &Article).unwrap();
        let on_comment = make::<Review, _>("Review::Draft", &Comment).unwrap();
        let other = make::<Review, _>(3_usize, &Comment).unwrap();

        assert_eq!(on_article, on_comment);
        assert_ne!(on_article, other);
    }

    #[test]
    fn state_queries_pass_through() {
        let bound = make::<Review, _>("draft", &Article).unwrap();
        assert!(bound.is_one_of(["approved", "draft"]));
        assert!(bound.can_transition_to(Review::Approved));
        assert_eq!(bound.into_state(), Review::Draft);
    }
}

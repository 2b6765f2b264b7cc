//! Violations found while validating a family's declarations.

use thiserror::Error;

/// A single problem with a family's mapping or transition graph.
///
/// Validation collects every violation before failing, so one
/// [`StateError::InvalidConfig`](crate::registry::StateError) reports all of
/// them at once.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("Default state '{state}' is not part of the family")]
    UnknownDefault { state: String },

    #[error("State '{state}' used in the transition graph is not part of the family")]
    UnknownState { state: String },

    #[error("Final state '{from}' cannot transition to '{to}'")]
    TransitionFromFinal { from: String, to: String },

    #[error("Short name '{name}' is used by more than one state")]
    DuplicateShortName { name: String },

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },
}

//! Resolution and configuration errors.

use crate::builder::ConfigViolation;
use thiserror::Error;

/// Errors raised while resolving states or loading a family's declarations.
///
/// All of these point at misconfiguration or bad input and are propagated
/// unchanged; none are retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StateError {
    /// An identifier could not be mapped to a state of the family
    #[error("Unable to resolve state '{identifier}' in family '{family}'")]
    Unresolved {
        identifier: String,
        family: &'static str,
    },

    /// The family has neither declared nor enumerable states
    #[error("No states declared for family '{family}'")]
    NoStatesDeclared { family: &'static str },

    /// The entity has no state field by that name
    #[error("Entity '{entity}' has no state field '{field}'")]
    UnknownField { entity: &'static str, field: String },

    /// The family's declarations failed validation
    #[error("Invalid state configuration for '{family}': {}", join(.violations))]
    InvalidConfig {
        family: &'static str,
        violations: Vec<ConfigViolation>,
    },
}

impl StateError {
    pub(crate) fn unresolved(identifier: impl ToString, family: &'static str) -> Self {
        Self::Unresolved {
            identifier: identifier.to_string(),
            family,
        }
    }
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

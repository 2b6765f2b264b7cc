//! Build errors for transition builders.

use thiserror::Error;

/// Errors that can occur when building closure-based transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition handler not specified. Call .handle(f)")]
    MissingHandler,
}

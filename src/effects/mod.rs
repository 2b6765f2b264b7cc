//! Transitions and their execution.
//!
//! This module is the side-effecting shell around the pure core: guarded,
//! parameterized operations on entities plus the executor that runs them.
//!
//! # Key Concepts
//!
//! - **Transitions**: a guard and a handler, built fresh for each invocation
//! - **Services**: environment values a handler declares and the executor
//!   supplies
//! - **Execution**: guard first, then dependencies, then the handler; a failed
//!   guard is an error, never a silent no-op

mod executor;
mod services;
mod transition;

pub use executor::{execute, execute_with};
pub use services::{FromServices, MissingDependency, Services};
pub use transition::{FromEntity, Transition, TransitionError};

//! Core state types and logic.
//!
//! This module contains the pure core of the state layer:
//! - State families via the `State` trait
//! - Identifiers states are looked up by (`StateRef`)
//! - Short-name derivation
//! - Guard predicates for transition control

mod guard;
mod naming;
mod state;

pub use guard::Guard;
pub use naming::derive_short_name;
pub(crate) use state::declared_name;
pub use state::{State, StateRef};

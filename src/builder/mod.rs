//! Builder API for declaring state families and transitions.
//!
//! This module provides the family configuration (default state and
//! transition graph), the `state_enum!` macro, and a fluent builder for
//! closure-based transitions.

pub mod config;
pub mod error;
pub mod macros;
pub mod transition;
pub mod violations;

pub use config::{StateConfig, StateConfigDef};
pub use error::BuildError;
pub use transition::{FnTransition, TransitionBuilder};
pub use violations::ConfigViolation;

use crate::core::Guard;
use crate::effects::TransitionError;

/// Create an unconditional transition from a handler.
///
/// # Example
///
/// ```
/// use entity_states::builder::simple_transition;
/// use entity_states::effects::Transition;
///
/// struct Lamp {
///     on: bool,
/// }
///
/// let toggle = simple_transition("toggle", |lamp: &mut Lamp| {
///     lamp.on = !lamp.on;
///     Ok(lamp.on)
/// });
/// assert!(toggle.can_transition(&Lamp { on: false }));
/// ```
pub fn simple_transition<E, O, F>(name: impl Into<String>, handler: F) -> FnTransition<E, O>
where
    E: 'static,
    F: Fn(&mut E) -> Result<O, TransitionError> + Send + Sync + 'static,
{
    FnTransition::from_parts(name, Guard::always(), handler)
}

/// Create a transition with a guard predicate.
///
/// # Example
///
/// ```
/// use entity_states::builder::guarded_transition;
/// use entity_states::effects::Transition;
///
/// struct Lamp {
///     on: bool,
///     broken: bool,
/// }
///
/// let switch_on = guarded_transition(
///     "switch_on",
///     |lamp: &Lamp| !lamp.broken && !lamp.on,
///     |lamp: &mut Lamp| {
///         lamp.on = true;
///         Ok(())
///     },
/// );
/// assert!(switch_on.can_transition(&Lamp { on: false, broken: false }));
/// assert!(!switch_on.can_transition(&Lamp { on: false, broken: true }));
/// ```
pub fn guarded_transition<E, O, G, F>(
    name: impl Into<String>,
    guard: G,
    handler: F,
) -> FnTransition<E, O>
where
    E: 'static,
    G: Fn(&E) -> bool + Send + Sync + 'static,
    F: Fn(&mut E) -> Result<O, TransitionError> + Send + Sync + 'static,
{
    FnTransition::from_parts(name, Guard::new(guard), handler)
}

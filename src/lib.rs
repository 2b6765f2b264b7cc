//! Entity States: typed state fields and guarded transitions for entities
//!
//! A state family is a closed set of named states an entity field can hold.
//! Each family has a cached mapping from short names to states, an optional
//! default, and a transition graph. Entities bind families to fields, get
//! defaults on creation, and move between states through guarded transitions.
//!
//! # Core Concepts
//!
//! - **State**: a family member, resolvable by short name, type identifier or
//!   1-based index via the `State` trait
//! - **Registry**: the process-wide cache of mappings and transition graphs
//! - **Transitions**: guarded operations run by the executor, with
//!   dependencies supplied through `Services`
//! - **Entities**: `HasStates` binds families to fields and translates state
//!   identifiers into query filters
//!
//! # Example
//!
//! ```rust
//! use entity_states::builder::StateConfig;
//! use entity_states::core::State;
//! use entity_states::entity::{Field, HasStates, StateFields};
//! use entity_states::state_enum;
//!
//! state_enum! {
//!     pub enum OrderState {
//!         Draft,
//!         Placed,
//!         Cancelled,
//!     }
//!     final: [Cancelled]
//!     config: StateConfig::new()
//!         .default_state(OrderState::Draft)
//!         .allow_transitions(OrderState::Draft, [OrderState::Placed, OrderState::Cancelled])
//!         .allow_transition(OrderState::Placed, OrderState::Cancelled)
//! }
//!
//! #[derive(Default)]
//! pub struct Order {
//!     pub state: Option<OrderState>,
//! }
//!
//! pub const STATE: Field<Order, OrderState> =
//!     Field::new("state", |o| &o.state, |o| &mut o.state);
//!
//! impl HasStates for Order {
//!     fn state_fields() -> StateFields<Self> {
//!         StateFields::new().field(STATE)
//!     }
//! }
//!
//! assert_eq!(OrderState::resolve("placed").unwrap(), OrderState::Placed);
//! assert_eq!(OrderState::resolve(3_usize).unwrap(), OrderState::Cancelled);
//!
//! let mut order = Order::default().with_default_states().unwrap();
//! assert_eq!(STATE.transitionable_states(&order), vec!["placed", "cancelled"]);
//!
//! STATE.transition_to(&mut order, "placed").unwrap();
//! assert!(STATE.transition_to(&mut order, "draft").is_err());
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod entity;
pub mod registry;

// Re-export commonly used types
pub use self::builder::{StateConfig, TransitionBuilder};
pub use self::core::{Guard, State, StateRef};
pub use self::effects::{Services, Transition, TransitionError};
pub use self::entity::{Field, HasStates, StateFields, StateFilter};
pub use self::registry::StateError;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

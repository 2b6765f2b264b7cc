//! Binding state families to entity fields.
//!
//! An entity lists its state fields once through [`HasStates::state_fields`].
//! The list is cached per entity type and drives default assignment on
//! creation, state listings, query filters and transitions.
//!
//! # Example
//!
//! ```rust
//! use entity_states::builder::StateConfig;
//! use entity_states::entity::{Field, HasStates, StateFields};
//! use entity_states::state_enum;
//!
//! state_enum! {
//!     pub enum PaymentState {
//!         Pending,
//!         Paid,
//!         Failed,
//!     }
//!     config: StateConfig::new()
//!         .default_state(PaymentState::Pending)
//!         .allow_transitions(PaymentState::Pending, [PaymentState::Paid, PaymentState::Failed])
//! }
//!
//! #[derive(Default)]
//! pub struct Payment {
//!     pub state: Option<PaymentState>,
//! }
//!
//! pub const STATE: Field<Payment, PaymentState> =
//!     Field::new("state", |p| &p.state, |p| &mut p.state);
//!
//! impl HasStates for Payment {
//!     fn state_fields() -> StateFields<Self> {
//!         StateFields::new().field(STATE)
//!     }
//! }
//!
//! let mut payment = Payment::default().with_default_states().unwrap();
//! assert_eq!(payment.state, Some(PaymentState::Pending));
//!
//! STATE.transition_to(&mut payment, "paid").unwrap();
//! assert!(STATE.transition_to(&mut payment, "failed").is_err());
//!
//! let filter = Payment::where_state("state", ["paid", "PaymentState::Paid", "bogus"]).unwrap();
//! assert_eq!(filter.values, vec!["paid"]);
//! ```

pub mod cast;
mod field;
mod instance;
mod query;

pub use field::{Field, TransitionTo};
pub use instance::{make, BoundState};
pub use query::{FilterMode, StateFilter};

use crate::core::State;
use crate::effects::{self, FromEntity, Services, Transition, TransitionError};
use crate::registry::{self, StateError};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// An entity with one or more state fields.
pub trait HasStates: Sized + 'static {
    /// The entity's state fields. Called once per entity type; the result
    /// is cached.
    fn state_fields() -> StateFields<Self>;

    /// Identity used when describing the entity in errors.
    fn entity_key(&self) -> Option<String> {
        None
    }

    /// Type name plus key, e.g. `app::Payment(42)`.
    fn describe(&self) -> String {
        match self.entity_key() {
            Some(key) => format!("{}({key})", type_name::<Self>()),
            None => type_name::<Self>().to_string(),
        }
    }

    /// The cached field list.
    fn fields() -> Result<Arc<StateFields<Self>>, StateError> {
        registry::cached(|| Ok(Self::state_fields()))
    }

    /// Every state field with the short names of its family, in field
    /// declaration order.
    fn get_states() -> Result<Vec<(String, Vec<String>)>, StateError> {
        let fields = Self::fields()?;
        fields
            .iter()
            .map(|field| field.states().map(|states| (field.name().to_string(), states)))
            .collect()
    }

    /// Short names of the family bound to `field`.
    ///
    /// An unknown field yields an empty list rather than an error.
    fn get_states_for(field: &str) -> Result<Vec<String>, StateError> {
        match Self::fields()?.find(field) {
            Some(field) => field.states(),
            None => Ok(Vec::new()),
        }
    }

    /// Every state field with its family's default, if any, in field
    /// declaration order.
    fn get_default_states() -> Result<Vec<(String, Option<String>)>, StateError> {
        let fields = Self::fields()?;
        fields
            .iter()
            .map(|field| {
                field
                    .default_state()
                    .map(|default| (field.name().to_string(), default))
            })
            .collect()
    }

    /// Default short name of the family bound to `field`; `None` when the
    /// family has no default or the field is unknown.
    fn get_default_state_for(field: &str) -> Result<Option<String>, StateError> {
        match Self::fields()?.find(field) {
            Some(field) => field.default_state(),
            None => Ok(None),
        }
    }

    /// Creation hook: assign each unset field its family's default.
    ///
    /// Fields that already hold a state are left alone. Every field's family
    /// is loaded before any field is assigned, so an error leaves the entity
    /// untouched.
    fn apply_default_states(&mut self) -> Result<(), StateError> {
        let fields = Self::fields()?;
        for field in fields.iter() {
            field.default_state()?;
        }
        for field in fields.iter() {
            field.apply_default(self)?;
        }
        Ok(())
    }

    /// Builder form of [`HasStates::apply_default_states`].
    fn with_default_states(mut self) -> Result<Self, StateError> {
        self.apply_default_states()?;
        Ok(self)
    }

    /// Persisted representation of every state field, in field declaration
    /// order.
    fn stored_states(&self) -> Result<Vec<(String, Option<String>)>, StateError> {
        let fields = Self::fields()?;
        Ok(fields
            .iter()
            .map(|field| (field.name().to_string(), field.store(self)))
            .collect())
    }

    /// Load a persisted value into the named field.
    fn load_state(&mut self, field: &str, stored: Option<&str>) -> Result<(), StateError> {
        let fields = Self::fields()?;
        fields.require(field)?.load(self, stored)
    }

    /// Filter selecting rows whose `field` holds one of `identifiers`.
    fn where_state<I>(field: &str, identifiers: I) -> Result<StateFilter, StateError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        state_filter::<Self, I>(field, identifiers, FilterMode::In)
    }

    /// Filter selecting rows whose `field` holds none of `identifiers`.
    fn where_not_state<I>(field: &str, identifiers: I) -> Result<StateFilter, StateError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        state_filter::<Self, I>(field, identifiers, FilterMode::NotIn)
    }

    /// Run a pre-built transition against this entity.
    fn transition<T>(
        &mut self,
        transition: T,
        services: &Services,
    ) -> Result<T::Output, TransitionError>
    where
        T: Transition<Self>,
    {
        effects::execute(self, transition, services)
    }

    /// Build a transition from this entity and `args`, then run it.
    fn transition_with<T>(
        &mut self,
        args: T::Args,
        services: &Services,
    ) -> Result<T::Output, TransitionError>
    where
        T: FromEntity<Self>,
    {
        effects::execute_with::<Self, T>(self, args, services)
    }
}

fn state_filter<E, I>(
    field: &str,
    identifiers: I,
    mode: FilterMode,
) -> Result<StateFilter, StateError>
where
    E: HasStates,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let fields = E::fields()?;
    let mut identifiers = identifiers
        .into_iter()
        .map(|identifier| identifier.as_ref().to_string());
    let values = fields.require(field)?.translate(&mut identifiers)?;
    Ok(StateFilter::new(field, values, mode))
}

/// The state fields of an entity type, in declaration order.
pub struct StateFields<E> {
    fields: Vec<Box<dyn ErasedField<E>>>,
}

impl<E: 'static> StateFields<E> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field. A later field with the same name replaces the earlier one.
    pub fn field<S: State>(mut self, field: Field<E, S>) -> Self {
        self.fields.retain(|existing| existing.name() != field.name());
        self.fields.push(Box::new(field));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Family type name bound to `field`.
    pub fn family_of(&self, field: &str) -> Option<&'static str> {
        self.find(field).map(|field| field.family())
    }

    fn iter(&self) -> impl Iterator<Item = &dyn ErasedField<E>> {
        self.fields.iter().map(|field| field.as_ref())
    }

    fn find(&self, name: &str) -> Option<&dyn ErasedField<E>> {
        self.iter().find(|field| field.name() == name)
    }

    fn require(&self, name: &str) -> Result<&dyn ErasedField<E>, StateError> {
        self.find(name).ok_or_else(|| StateError::UnknownField {
            entity: type_name::<E>(),
            field: name.to_string(),
        })
    }
}

impl<E: 'static> Default for StateFields<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for StateFields<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|field| (field.name(), field.family())))
            .finish()
    }
}

/// A [`Field`] with its family erased, so fields of different families can
/// share one list.
trait ErasedField<E>: Send + Sync {
    fn name(&self) -> &'static str;
    fn family(&self) -> &'static str;
    fn states(&self) -> Result<Vec<String>, StateError>;
    fn default_state(&self) -> Result<Option<String>, StateError>;
    fn apply_default(&self, entity: &mut E) -> Result<bool, StateError>;
    fn store(&self, entity: &E) -> Option<String>;
    fn load(&self, entity: &mut E, stored: Option<&str>) -> Result<(), StateError>;
    fn translate(
        &self,
        identifiers: &mut dyn Iterator<Item = String>,
    ) -> Result<Vec<String>, StateError>;
}

impl<E: 'static, S: State> ErasedField<E> for Field<E, S> {
    fn name(&self) -> &'static str {
        Field::name(self)
    }

    fn family(&self) -> &'static str {
        S::family()
    }

    fn states(&self) -> Result<Vec<String>, StateError> {
        S::all()
    }

    fn default_state(&self) -> Result<Option<String>, StateError> {
        Ok(S::default_state()?.map(|state| state.short_name()))
    }

    fn apply_default(&self, entity: &mut E) -> Result<bool, StateError> {
        Field::apply_default(self, entity)
    }

    fn store(&self, entity: &E) -> Option<String> {
        Field::store(self, entity)
    }

    fn load(&self, entity: &mut E, stored: Option<&str>) -> Result<(), StateError> {
        Field::load(self, entity, stored)
    }

    fn translate(
        &self,
        identifiers: &mut dyn Iterator<Item = String>,
    ) -> Result<Vec<String>, StateError> {
        Field::translate(self, identifiers)
    }
}

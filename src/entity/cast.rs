//! Conversion between states and their persisted form.
//!
//! A state is stored as its short name. Reading accepts anything the family
//! resolves: short names, type identifiers and 1-based indices.

use crate::core::{State, StateRef};
use crate::entity::instance::{make, BoundState};
use crate::registry::StateError;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Persisted form of a state.
pub fn to_stored<S: State>(state: &S) -> String {
    state.short_name()
}

/// Read a persisted value back into a state.
pub fn from_stored<S: State>(stored: &str) -> Result<S, StateError> {
    S::resolve(stored)
}

/// Read a persisted value and bind it to the entity that owns the field.
pub fn from_stored_for<'e, S: State, E>(
    stored: &str,
    entity: &'e E,
) -> Result<BoundState<'e, S, E>, StateError> {
    make(stored, entity)
}

/// `serialize_with` helper writing the short name.
pub fn serialize_state<S, Ser>(state: &S, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
where
    S: State,
    Ser: Serializer,
{
    serializer.serialize_str(&to_stored(state))
}

/// `deserialize_with` helper accepting a name or a 1-based index.
///
/// Compact formats that cannot describe their own data only carry the
/// written short name, so they are read as strings.
pub fn deserialize_state<'de, S, D>(deserializer: D) -> Result<S, D::Error>
where
    S: State,
    D: Deserializer<'de>,
{
    if deserializer.is_human_readable() {
        deserializer.deserialize_any(StateVisitor(PhantomData))
    } else {
        deserializer.deserialize_str(StateVisitor(PhantomData))
    }
}

struct StateVisitor<S>(PhantomData<S>);

impl<S: State> StateVisitor<S> {
    fn resolve<E: de::Error>(&self, identifier: StateRef<'_, S>) -> Result<S, E> {
        S::resolve(identifier).map_err(E::custom)
    }
}

impl<'de, S: State> Visitor<'de> for StateVisitor<S> {
    type Value = S;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a state name or index of family {}", S::family())
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<S, E> {
        self.resolve(value.into())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<S, E> {
        let index = usize::try_from(value).map_err(E::custom)?;
        self.resolve(StateRef::Index(index))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<S, E> {
        let index = usize::try_from(value)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))?;
        self.resolve(StateRef::Index(index))
    }
}

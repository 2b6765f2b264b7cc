//! Core State trait for state families.
//!
//! A family is a closed enum whose variants are the concrete states an entity
//! field may hold. The trait carries the family's static declarations; the
//! provided methods resolve identifiers and answer transition queries against
//! the cached registry.

use crate::builder::StateConfig;
use crate::registry::{self, StateError, StateMapping};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::warn;

/// Trait for state families.
///
/// Usually generated by [`state_enum!`](crate::state_enum); implement it by
/// hand when variants need custom short names computed elsewhere or when the
/// enum is defined by another macro.
///
/// # Required Traits
///
/// - `Clone`, `PartialEq`, `Debug`: states are plain values
/// - `Serialize` + `Deserialize`: states persist as their short name
///   (see [`crate::entity::cast`])
///
/// # Example
///
/// ```rust
/// use entity_states::core::State;
/// use entity_states::entity::cast;
/// use serde::{Deserialize, Deserializer, Serialize, Serializer};
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum TaskState {
///     Pending,
///     Running,
///     Complete,
/// }
///
/// impl State for TaskState {
///     fn family() -> &'static str {
///         "TaskState"
///     }
///
///     fn variants() -> Vec<Self> {
///         vec![Self::Pending, Self::Running, Self::Complete]
///     }
///
///     fn type_name(&self) -> &'static str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Running => "Running",
///             Self::Complete => "Complete",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Complete)
///     }
/// }
///
/// impl Serialize for TaskState {
///     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
///         cast::serialize_state(self, serializer)
///     }
/// }
///
/// impl<'de> Deserialize<'de> for TaskState {
///     fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
///         cast::deserialize_state(deserializer)
///     }
/// }
///
/// assert_eq!(TaskState::Running.short_name(), "running");
/// assert_eq!(TaskState::resolve("complete").unwrap(), TaskState::Complete);
/// assert!(TaskState::Pending.can_transition_to("running"));
/// assert!(TaskState::Complete.transitionable_states().is_empty());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Name of the family type, e.g. `PaymentState`.
    fn family() -> &'static str;

    /// Module the family is declared in. Used to match fully-qualified type
    /// identifiers; empty when unknown.
    fn module_path() -> &'static str {
        ""
    }

    /// Every variant of the family, in declaration order.
    fn variants() -> Vec<Self>;

    /// Explicit, ordered list of the states that make up the family.
    ///
    /// When present it replaces [`State::variants`] entirely, ordering
    /// included.
    fn declared_states() -> Option<Vec<Self>> {
        None
    }

    /// Identifier of this variant as written in code, e.g. `Paid`.
    fn type_name(&self) -> &'static str;

    /// Explicit short name, overriding the derived one.
    fn explicit_name(&self) -> Option<&'static str> {
        None
    }

    /// Default state and transition graph of the family.
    fn config() -> StateConfig<Self> {
        StateConfig::new()
    }

    /// Check if this is a final (terminal) state.
    ///
    /// Final states never have outgoing transitions.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }

    /// Canonical short name, as stored.
    ///
    /// Falls back to the declared or derived name when the family's mapping
    /// cannot be built.
    fn short_name(&self) -> String {
        match Self::mapping() {
            Ok(mapping) => mapping
                .name_of(self)
                .map(str::to_string)
                .unwrap_or_else(|| declared_name(self)),
            Err(err) => {
                warn!(family = Self::family(), error = %err, "state mapping unavailable");
                declared_name(self)
            }
        }
    }

    /// The family's state mapping.
    fn mapping() -> Result<Arc<StateMapping<Self>>, StateError> {
        registry::mapping::<Self>()
    }

    /// Resolve an identifier to a concrete state of this family.
    fn resolve<'a>(identifier: impl Into<StateRef<'a, Self>>) -> Result<Self, StateError> {
        registry::resolve::<Self>(identifier)
    }

    /// Short names of all states, in mapping order.
    fn all() -> Result<Vec<String>, StateError> {
        registry::all::<Self>()
    }

    /// The family's default state, if declared.
    fn default_state() -> Result<Option<Self>, StateError> {
        Ok(registry::graph::<Self>()?.default_state().cloned())
    }

    /// Type-based equality against another state or identifier.
    ///
    /// Unresolvable identifiers are never equal.
    fn equals<'a>(&self, other: impl Into<StateRef<'a, Self>>) -> bool {
        match Self::resolve(other) {
            Ok(other) => other.type_name() == self.type_name(),
            Err(StateError::Unresolved { .. }) => false,
            Err(err) => {
                warn!(family = Self::family(), error = %err, "state comparison failed");
                false
            }
        }
    }

    /// Alias of [`State::equals`].
    fn is<'a>(&self, identifier: impl Into<StateRef<'a, Self>>) -> bool {
        self.equals(identifier)
    }

    /// True when any of the identifiers resolves to this state.
    fn is_one_of<'a, I>(&self, identifiers: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<StateRef<'a, Self>>,
    {
        identifiers.into_iter().any(|identifier| self.equals(identifier))
    }

    /// Short names reachable from this state, in mapping order.
    ///
    /// Fails when the family's graph cannot be loaded.
    fn try_transitionable_states(&self) -> Result<Vec<String>, StateError> {
        Ok(registry::graph::<Self>()?.transitionable_states(self))
    }

    /// Infallible form of [`State::try_transitionable_states`].
    ///
    /// Empty when the state is terminal. A family that cannot be loaded is
    /// logged and also yields an empty list.
    fn transitionable_states(&self) -> Vec<String> {
        self.try_transitionable_states().unwrap_or_else(|err| {
            warn!(family = Self::family(), error = %err, "cannot list transitions");
            Vec::new()
        })
    }

    /// Whether the target is reachable from this state.
    ///
    /// An unresolvable target is `Ok(false)`; configuration errors are
    /// returned.
    fn try_can_transition_to<'a>(
        &self,
        target: impl Into<StateRef<'a, Self>>,
    ) -> Result<bool, StateError> {
        let graph = registry::graph::<Self>()?;
        match graph.mapping().resolve(target.into()) {
            Ok(target) => Ok(graph.can_transition(self, &target)),
            Err(StateError::Unresolved { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Infallible form of [`State::try_can_transition_to`].
    ///
    /// Unresolvable targets return `false` rather than an error.
    fn can_transition_to<'a>(&self, target: impl Into<StateRef<'a, Self>>) -> bool {
        self.try_can_transition_to(target).unwrap_or_else(|err| {
            warn!(family = Self::family(), error = %err, "cannot check transition");
            false
        })
    }
}

/// Short name a state declares or derives, without consulting the registry.
pub(crate) fn declared_name<S: State>(state: &S) -> String {
    match state.explicit_name() {
        Some(name) => name.to_string(),
        None => super::derive_short_name(S::family(), state.type_name()),
    }
}

/// Anything a state can be looked up by.
///
/// Built from a family value, a short name or type identifier, or a 1-based
/// index into the family's mapping.
#[derive(Clone, Debug, PartialEq)]
pub enum StateRef<'a, S> {
    State(S),
    Name(Cow<'a, str>),
    Index(usize),
}

impl<S: State> std::fmt::Display for StateRef<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State(state) => write!(f, "{}::{}", S::family(), state.type_name()),
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

impl<'a, S> From<&'a str> for StateRef<'a, S> {
    fn from(name: &'a str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl<'a, S> From<&'a String> for StateRef<'a, S> {
    fn from(name: &'a String) -> Self {
        Self::Name(Cow::Borrowed(name.as_str()))
    }
}

impl<S> From<String> for StateRef<'_, S> {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl<S> From<usize> for StateRef<'_, S> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

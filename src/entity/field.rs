//! Typed access to one state field of an entity.

use crate::core::{State, StateRef};
use crate::effects::{execute, Services, Transition, TransitionError};
use crate::entity::instance::{make, BoundState};
use crate::entity::query::{FilterMode, StateFilter};
use crate::entity::HasStates;
use crate::registry::{self, StateError, TransitionGraph};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// One entity field holding a state of family `S`.
///
/// The field itself is an `Option<S>` on the entity; `None` means unset.
/// Accessors are plain function pointers so non-capturing closures work:
///
/// ```rust
/// use entity_states::entity::Field;
/// use entity_states::state_enum;
///
/// state_enum! {
///     pub enum Shipment {
///         Waiting,
///         InTransit,
///         Delivered,
///     }
///     final: [Delivered]
/// }
///
/// pub struct Parcel {
///     pub shipment: Option<Shipment>,
/// }
///
/// const SHIPMENT: Field<Parcel, Shipment> =
///     Field::new("shipment", |p| &p.shipment, |p| &mut p.shipment);
///
/// let parcel = Parcel { shipment: Some(Shipment::InTransit) };
/// assert_eq!(SHIPMENT.get(&parcel), Some(&Shipment::InTransit));
/// assert_eq!(SHIPMENT.transitionable_states(&parcel), vec!["waiting", "delivered"]);
/// ```
pub struct Field<E, S> {
    name: &'static str,
    get: fn(&E) -> &Option<S>,
    get_mut: fn(&mut E) -> &mut Option<S>,
}

impl<E, S> Clone for Field<E, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, S> Copy for Field<E, S> {}

impl<E, S> fmt::Debug for Field<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

impl<E, S> Field<E, S> {
    pub const fn new(
        name: &'static str,
        get: fn(&E) -> &Option<S>,
        get_mut: fn(&mut E) -> &mut Option<S>,
    ) -> Self {
        Self { name, get, get_mut }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<E: 'static, S: State> Field<E, S> {
    /// Current state, if set.
    pub fn get<'e>(&self, entity: &'e E) -> Option<&'e S> {
        (self.get)(entity).as_ref()
    }

    /// Assign a state directly, bypassing guards.
    pub fn set(&self, entity: &mut E, state: S) {
        *(self.get_mut)(entity) = Some(state);
    }

    /// Current state bound to the entity.
    pub fn state<'e>(&self, entity: &'e E) -> Option<BoundState<'e, S, E>> {
        self.get(entity)
            .map(|state| BoundState::new(state.clone(), entity))
    }

    /// Resolve `identifier` and bind it to `entity`.
    pub fn make<'e, 'a>(
        &self,
        identifier: impl Into<StateRef<'a, S>>,
        entity: &'e E,
    ) -> Result<BoundState<'e, S, E>, StateError> {
        make(identifier, entity)
    }

    /// Short names reachable from the current state; empty when unset.
    pub fn transitionable_states(&self, entity: &E) -> Vec<String> {
        self.get(entity)
            .map(State::transitionable_states)
            .unwrap_or_default()
    }

    /// Whether the current state may move to `target`. False when unset or
    /// when `target` does not resolve.
    pub fn can_transition_to<'a>(&self, entity: &E, target: impl Into<StateRef<'a, S>>) -> bool {
        self.get(entity)
            .is_some_and(|state| state.can_transition_to(target))
    }

    /// Move the field to `target` through the transition graph.
    pub fn transition_to<'a>(
        &self,
        entity: &mut E,
        target: impl Into<StateRef<'a, S>>,
    ) -> Result<Option<S>, TransitionError>
    where
        E: HasStates,
    {
        let transition = TransitionTo::new(*self, target)?;
        execute(entity, transition, &Services::new())
    }

    /// Assign the family's default state when the field is unset.
    ///
    /// Returns whether a default was applied.
    pub fn apply_default(&self, entity: &mut E) -> Result<bool, StateError> {
        if self.get(entity).is_some() {
            return Ok(false);
        }
        let graph = registry::graph::<S>()?;
        match graph.default_state() {
            Some(default) => {
                trace!(field = self.name, state = default.type_name(), "applied default state");
                self.set(entity, default.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persisted representation of the current state.
    pub fn store(&self, entity: &E) -> Option<String> {
        self.get(entity).map(State::short_name)
    }

    /// Load a persisted representation into the field.
    pub fn load(&self, entity: &mut E, stored: Option<&str>) -> Result<(), StateError> {
        *(self.get_mut)(entity) = match stored {
            Some(stored) => Some(S::resolve(stored)?),
            None => None,
        };
        Ok(())
    }

    /// Resolve identifiers to the short names to filter on.
    ///
    /// Unknown identifiers are dropped. The result is deduplicated and in
    /// mapping order.
    pub fn translate<I>(&self, identifiers: I) -> Result<Vec<String>, StateError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mapping = registry::mapping::<S>()?;
        let mut positions = BTreeSet::new();

        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match mapping.resolve(StateRef::Name(Cow::Borrowed(identifier))) {
                Ok(state) => {
                    positions.extend(mapping.position(&state));
                }
                Err(_) => {
                    debug!(field = self.name, identifier, "dropped unknown state from filter")
                }
            }
        }

        Ok(positions
            .into_iter()
            .map(|index| mapping.entries()[index].short_name().to_string())
            .collect())
    }

    /// Filter selecting rows whose field is one of `states`.
    pub fn filter(&self, states: impl IntoIterator<Item = S>) -> Result<StateFilter, StateError> {
        let names: Vec<String> = states.into_iter().map(|state| state.short_name()).collect();
        Ok(StateFilter::new(self.name, self.translate(names)?, FilterMode::In))
    }
}

/// Built-in transition that moves one field to a target state.
///
/// The guard is the family's transition graph; the handler assigns the
/// field and returns the previous state. The graph is loaded on
/// construction, so a misconfigured family fails here instead of at the
/// guard.
pub struct TransitionTo<E, S> {
    field: Field<E, S>,
    to: S,
    graph: Arc<TransitionGraph<S>>,
}

impl<E: 'static, S: State> TransitionTo<E, S> {
    pub fn new<'a>(
        field: Field<E, S>,
        to: impl Into<StateRef<'a, S>>,
    ) -> Result<Self, StateError> {
        let graph = registry::graph::<S>()?;
        let to = graph.mapping().resolve(to.into())?;
        Ok(Self { field, to, graph })
    }

    pub fn target(&self) -> &S {
        &self.to
    }
}

impl<E: 'static, S: State> Transition<E> for TransitionTo<E, S> {
    type Output = Option<S>;
    type Deps<'s> = ();

    fn name(&self) -> String {
        format!("{} -> {}", self.field.name, self.to.short_name())
    }

    fn can_transition(&self, entity: &E) -> bool {
        self.field
            .get(entity)
            .is_some_and(|from| self.graph.can_transition(from, &self.to))
    }

    fn handle(self, entity: &mut E, _: ()) -> Result<Option<S>, TransitionError> {
        let previous = self.field.get(entity).cloned();
        self.field.set(entity, self.to);
        Ok(previous)
    }
}

//! Process-wide registry of state mappings and transition graphs.
//!
//! Every family's mapping and graph is computed once from its static
//! declarations and cached for the life of the process. Entries are shared
//! `Arc`s: readers never block each other, and replacing an entry swaps the
//! whole value instead of mutating it.
//!
//! # Example
//!
//! ```rust
//! use entity_states::builder::StateConfig;
//! use entity_states::core::State;
//! use entity_states::{registry, state_enum};
//!
//! state_enum! {
//!     pub enum Ticket {
//!         Open,
//!         Triaged,
//!         Closed,
//!     }
//!     final: [Closed]
//! }
//!
//! assert_eq!(registry::all::<Ticket>().unwrap(), vec!["open", "triaged", "closed"]);
//! assert_eq!(registry::resolve::<Ticket>(2_usize).unwrap(), Ticket::Triaged);
//!
//! // Swap in a stricter graph at runtime.
//! registry::replace_config(StateConfig::new().allow_transition(Ticket::Open, Ticket::Triaged))
//!     .unwrap();
//! assert_eq!(Ticket::Open.transitionable_states(), vec!["triaged"]);
//! ```

mod error;
mod graph;
mod mapping;

pub use error::StateError;
pub use graph::TransitionGraph;
pub use mapping::{MappingEntry, StateMapping};

use crate::builder::StateConfig;
use crate::core::{State, StateRef};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::debug;

type Entry = Arc<dyn Any + Send + Sync>;

static CACHE: LazyLock<RwLock<HashMap<TypeId, Entry>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Fetch the cached value of type `T`, building it on first use.
///
/// The value is built outside the lock; if two callers race, the first one
/// to store its value wins and both get that value.
pub(crate) fn cached<T, F>(build: F) -> Result<Arc<T>, StateError>
where
    T: Any + Send + Sync,
    F: FnOnce() -> Result<T, StateError>,
{
    let key = TypeId::of::<T>();
    if let Some(value) = lookup::<T>(key) {
        return Ok(value);
    }

    let built = Arc::new(build()?);
    debug!(entry = std::any::type_name::<T>(), "cached state registry entry");

    let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
    match cache.get(&key).cloned().and_then(|e| e.downcast::<T>().ok()) {
        Some(existing) => Ok(existing),
        None => {
            cache.insert(key, built.clone());
            Ok(built)
        }
    }
}

fn lookup<T: Any + Send + Sync>(key: TypeId) -> Option<Arc<T>> {
    let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
    cache.get(&key).cloned().and_then(|e| e.downcast::<T>().ok())
}

fn store<T: Any + Send + Sync>(value: Arc<T>) {
    let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
    cache.insert(TypeId::of::<T>(), value);
}

fn evict<T: Any>() {
    let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
    cache.remove(&TypeId::of::<T>());
}

/// The ordered short-name mapping of a family.
pub fn mapping<S: State>() -> Result<Arc<StateMapping<S>>, StateError> {
    cached(StateMapping::<S>::build)
}

/// The validated transition graph of a family.
pub fn graph<S: State>() -> Result<Arc<TransitionGraph<S>>, StateError> {
    cached(|| TransitionGraph::build(mapping::<S>()?, S::config()))
}

/// Resolve an identifier to a concrete state of family `S`.
pub fn resolve<'a, S: State>(identifier: impl Into<StateRef<'a, S>>) -> Result<S, StateError> {
    mapping::<S>()?.resolve(identifier.into())
}

/// Short names of every state of family `S`, in mapping order.
pub fn all<S: State>() -> Result<Vec<String>, StateError> {
    Ok(mapping::<S>()?.names())
}

/// Replace the cached graph of `S` with one built from `config`.
///
/// The new graph is validated first; on error the current graph stays in
/// place.
pub fn replace_config<S: State>(config: StateConfig<S>) -> Result<(), StateError> {
    let graph = TransitionGraph::build(mapping::<S>()?, config)?;
    store(Arc::new(graph));
    debug!(family = S::family(), "replaced state configuration");
    Ok(())
}

/// Drop the cached mapping and graph of `S`; both are rebuilt from the
/// static declarations on next use.
pub fn invalidate<S: State>() {
    evict::<TransitionGraph<S>>();
    evict::<StateMapping<S>>();
    debug!(family = S::family(), "invalidated state registry entries");
}

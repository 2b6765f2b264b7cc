//! Ordered short-name to state mapping of one family.

use crate::builder::ConfigViolation;
use crate::core::{declared_name, State, StateRef};
use crate::registry::StateError;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::trace;

/// One state of a family together with its canonical short name.
#[derive(Clone, Debug)]
pub struct MappingEntry<S> {
    short_name: String,
    state: S,
}

impl<S: State> MappingEntry<S> {
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// `Family::Variant`
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", S::family(), self.state.type_name())
    }

    fn matches_type_path(&self, identifier: &str) -> bool {
        let identifier = identifier.trim_start_matches("::");
        let qualified = self.qualified_name();
        if identifier == qualified {
            return true;
        }

        let module = S::module_path();
        if module.is_empty() {
            return false;
        }

        let full = format!("{module}::{qualified}");
        if identifier == full || full.ends_with(&format!("::{identifier}")) {
            return true;
        }

        // `crate::billing::PaymentState::Paid` against `shop::billing::...`
        match (identifier.strip_prefix("crate::"), full.split_once("::")) {
            (Some(local), Some((_, full_local))) => local == full_local,
            _ => false,
        }
    }
}

/// The ordered association of short names to the states of a family.
///
/// Order is either the family's explicit declaration order or the enum's
/// variant order. Index-based resolution is 1-based over this order.
#[derive(Clone, Debug)]
pub struct StateMapping<S> {
    entries: Vec<MappingEntry<S>>,
}

impl<S: State> StateMapping<S> {
    /// Build the mapping from the family's static declarations.
    pub fn build() -> Result<Self, StateError> {
        let states = S::declared_states().unwrap_or_else(S::variants);
        Self::from_states(states)
    }

    pub(crate) fn from_states(states: Vec<S>) -> Result<Self, StateError> {
        if states.is_empty() {
            return Err(StateError::NoStatesDeclared {
                family: S::family(),
            });
        }

        let entries: Vec<MappingEntry<S>> = states
            .into_iter()
            .map(|state| MappingEntry {
                short_name: declared_name(&state),
                state,
            })
            .collect();

        match validate_unique(&entries) {
            Validation::Success(()) => Ok(Self { entries }),
            Validation::Failure(violations) => Err(StateError::InvalidConfig {
                family: S::family(),
                violations: violations.iter().cloned().collect(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MappingEntry<S>] {
        &self.entries
    }

    /// Short names in mapping order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.short_name.clone())
            .collect()
    }

    /// State registered under an exact short name.
    pub fn get(&self, short_name: &str) -> Option<&S> {
        self.entries
            .iter()
            .find(|entry| entry.short_name == short_name)
            .map(|entry| &entry.state)
    }

    /// Zero-based position of a state in the mapping.
    pub fn position(&self, state: &S) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.state.type_name() == state.type_name())
    }

    pub fn name_of(&self, state: &S) -> Option<&str> {
        self.position(state)
            .map(|index| self.entries[index].short_name.as_str())
    }

    pub fn contains(&self, state: &S) -> bool {
        self.position(state).is_some()
    }

    /// Resolve an identifier against this mapping.
    ///
    /// - a state is returned unchanged if it belongs to the mapping
    /// - a name is matched against short names first, then, if it contains
    ///   `::`, against type identifiers (`Family::Variant`, optionally
    ///   module-qualified)
    /// - an index is 1-based over the mapping order
    pub fn resolve(&self, identifier: StateRef<'_, S>) -> Result<S, StateError> {
        let resolved = match &identifier {
            StateRef::State(state) => self.position(state).map(|i| &self.entries[i].state),
            StateRef::Name(name) => self.get(name).or_else(|| {
                if name.contains("::") {
                    self.entries
                        .iter()
                        .find(|entry| entry.matches_type_path(name))
                        .map(|entry| &entry.state)
                } else {
                    None
                }
            }),
            StateRef::Index(index) => index
                .checked_sub(1)
                .and_then(|i| self.entries.get(i))
                .map(|entry| &entry.state),
        };

        match resolved {
            Some(state) => {
                trace!(
                    family = S::family(),
                    %identifier,
                    state = state.type_name(),
                    "resolved state"
                );
                Ok(state.clone())
            }
            None => Err(StateError::unresolved(&identifier, S::family())),
        }
    }
}

fn validate_unique<S: State>(
    entries: &[MappingEntry<S>],
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();
    let mut names = HashSet::new();
    let mut types = HashSet::new();

    for entry in entries {
        if !types.insert(entry.state.type_name()) {
            checks.push(Validation::fail(ConfigViolation::DuplicateState {
                state: entry.qualified_name(),
            }));
        } else if !names.insert(entry.short_name.as_str()) {
            checks.push(Validation::fail(ConfigViolation::DuplicateShortName {
                name: entry.short_name.clone(),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

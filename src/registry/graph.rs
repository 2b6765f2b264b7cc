//! Resolved transition graph of a family.

use crate::builder::{ConfigViolation, StateConfig};
use crate::core::State;
use crate::registry::{StateError, StateMapping};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Default state and adjacency of a family, validated against its mapping.
///
/// Without declared transitions every state reaches every other state,
/// except terminal ones (final states and states marked terminal in the
/// config). With any declared transition the graph is exactly what was
/// declared; states without an entry reach nothing.
#[derive(Debug)]
pub struct TransitionGraph<S> {
    mapping: Arc<StateMapping<S>>,
    default: Option<S>,
    // adjacency by mapping position, targets kept sorted
    reachable: Vec<Vec<usize>>,
    explicit: bool,
}

impl<S: State> TransitionGraph<S> {
    pub fn build(
        mapping: Arc<StateMapping<S>>,
        config: StateConfig<S>,
    ) -> Result<Self, StateError> {
        match validate(&mapping, &config) {
            Validation::Success(()) => {}
            Validation::Failure(violations) => {
                return Err(StateError::InvalidConfig {
                    family: S::family(),
                    violations: violations.iter().cloned().collect(),
                })
            }
        }

        let terminal: Vec<usize> = mapping
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                entry.state().is_final()
                    || config
                        .terminal_states()
                        .iter()
                        .any(|t| t.type_name() == entry.state().type_name())
            })
            .map(|(index, _)| index)
            .collect();

        let size = mapping.len();
        let mut reachable = vec![Vec::new(); size];
        let explicit = config.has_declared_transitions();

        if explicit {
            for (from, to) in config.transitions() {
                if let (Some(from), Some(to)) = (mapping.position(from), mapping.position(to)) {
                    if from != to && !reachable[from].contains(&to) {
                        reachable[from].push(to);
                    }
                }
            }
            for targets in &mut reachable {
                targets.sort_unstable();
            }
        } else {
            for (from, targets) in reachable.iter_mut().enumerate() {
                if !terminal.contains(&from) {
                    *targets = (0..size).filter(|to| *to != from).collect();
                }
            }
        }

        Ok(Self {
            mapping,
            default: config.declared_default().cloned(),
            reachable,
            explicit,
        })
    }

    pub fn mapping(&self) -> &StateMapping<S> {
        &self.mapping
    }

    pub fn default_state(&self) -> Option<&S> {
        self.default.as_ref()
    }

    /// Whether the graph came from declared transitions.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Short names reachable from `from`, in mapping order.
    pub fn transitionable_states(&self, from: &S) -> Vec<String> {
        let Some(from) = self.mapping.position(from) else {
            return Vec::new();
        };
        self.reachable[from]
            .iter()
            .map(|&to| self.mapping.entries()[to].short_name().to_string())
            .collect()
    }

    pub fn can_transition(&self, from: &S, to: &S) -> bool {
        match (self.mapping.position(from), self.mapping.position(to)) {
            (Some(from), Some(to)) => self.reachable[from].contains(&to),
            _ => false,
        }
    }

    pub fn is_terminal(&self, state: &S) -> bool {
        self.mapping
            .position(state)
            .is_none_or(|index| self.reachable[index].is_empty())
    }
}

fn validate<S: State>(
    mapping: &StateMapping<S>,
    config: &StateConfig<S>,
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    let qualified = |state: &S| format!("{}::{}", S::family(), state.type_name());
    let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

    if let Some(default) = config.declared_default() {
        if !mapping.contains(default) {
            checks.push(Validation::fail(ConfigViolation::UnknownDefault {
                state: qualified(default),
            }));
        }
    }

    for state in config.terminal_states() {
        if !mapping.contains(state) {
            checks.push(Validation::fail(ConfigViolation::UnknownState {
                state: qualified(state),
            }));
        }
    }

    for (from, to) in config.transitions() {
        for endpoint in [from, to] {
            if !mapping.contains(endpoint) {
                checks.push(Validation::fail(ConfigViolation::UnknownState {
                    state: qualified(endpoint),
                }));
            }
        }
        let terminal = from.is_final()
            || config
                .terminal_states()
                .iter()
                .any(|t| t.type_name() == from.type_name());
        if terminal {
            checks.push(Validation::fail(ConfigViolation::TransitionFromFinal {
                from: qualified(from),
                to: qualified(to),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

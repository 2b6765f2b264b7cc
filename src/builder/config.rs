//! Builder for a family's default state and transition graph.

use crate::core::State;
use crate::registry::StateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fluent declaration of a family's default state and allowed transitions.
///
/// Returned from [`State::config`]; validated and resolved into a
/// [`TransitionGraph`](crate::registry::TransitionGraph) the first time the
/// family is used.
///
/// # Example
///
/// ```rust
/// use entity_states::builder::StateConfig;
/// use entity_states::core::State;
/// use entity_states::state_enum;
///
/// state_enum! {
///     pub enum Order {
///         Placed,
///         Packed,
///         Shipped,
///         Cancelled,
///     }
///     final: [Shipped, Cancelled]
///     config: StateConfig::new()
///         .default_state(Order::Placed)
///         .allow_transitions(Order::Placed, [Order::Packed, Order::Cancelled])
///         .allow_transition(Order::Packed, Order::Shipped)
/// }
///
/// assert_eq!(Order::default_state().unwrap(), Some(Order::Placed));
/// assert_eq!(Order::Placed.transitionable_states(), vec!["packed", "cancelled"]);
/// assert!(!Order::Packed.can_transition_to("cancelled"));
/// ```
#[derive(Clone, Debug)]
pub struct StateConfig<S> {
    default: Option<S>,
    transitions: Vec<(S, S)>,
    terminal: Vec<S>,
    declared: bool,
}

impl<S: State> StateConfig<S> {
    /// Create an empty config: no default, every state reachable.
    pub fn new() -> Self {
        Self {
            default: None,
            transitions: Vec::new(),
            terminal: Vec::new(),
            declared: false,
        }
    }

    /// State assigned to unset fields when an entity is created.
    pub fn default_state(mut self, state: S) -> Self {
        self.default = Some(state);
        self
    }

    /// Allow `from -> to`.
    ///
    /// Declaring any transition restricts the graph to the declared edges.
    pub fn allow_transition(mut self, from: S, to: S) -> Self {
        self.transitions.push((from, to));
        self.declared = true;
        self
    }

    /// Allow `from` to reach each of `targets`.
    ///
    /// An empty `targets` still restricts the graph, leaving `from` terminal.
    pub fn allow_transitions(mut self, from: S, targets: impl IntoIterator<Item = S>) -> Self {
        for to in targets {
            self.transitions.push((from.clone(), to));
        }
        self.declared = true;
        self
    }

    /// Mark a state as having no outgoing transitions.
    pub fn terminal(mut self, state: S) -> Self {
        self.terminal.push(state);
        self
    }

    /// Resolve a name-based definition against the family.
    pub fn from_def(def: &StateConfigDef) -> Result<Self, StateError> {
        let mut config = Self::new();

        if let Some(default) = &def.default {
            config = config.default_state(S::resolve(default)?);
        }

        if let Some(transitions) = &def.transitions {
            config.declared = true;
            for (from, targets) in transitions {
                let from = S::resolve(from)?;
                for to in targets {
                    config.transitions.push((from.clone(), S::resolve(to)?));
                }
            }
        }

        for state in &def.terminal {
            config = config.terminal(S::resolve(state)?);
        }

        Ok(config)
    }

    pub fn declared_default(&self) -> Option<&S> {
        self.default.as_ref()
    }

    pub fn transitions(&self) -> &[(S, S)] {
        &self.transitions
    }

    pub fn terminal_states(&self) -> &[S] {
        &self.terminal
    }

    /// Whether an adjacency was declared at all.
    pub fn has_declared_transitions(&self) -> bool {
        self.declared
    }
}

impl<S: State> Default for StateConfig<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable, name-based form of a [`StateConfig`].
///
/// ```json
/// {
///   "default": "pending",
///   "transitions": { "pending": ["paid", "failed"], "paid": [] },
///   "terminal": ["failed"]
/// }
/// ```
///
/// Names may be short names, type identifiers, or (in JSON) anything else
/// [`State::resolve`] accepts as a string.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateConfigDef {
    pub default: Option<String>,
    pub transitions: Option<BTreeMap<String, Vec<String>>>,
    pub terminal: Vec<String>,
}

impl StateConfigDef {
    /// Parse a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

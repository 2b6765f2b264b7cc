//! Query filters over state columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the column must or must not hold one of the values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    In,
    NotIn,
}

/// A membership test on a state column, ready to hand to a query builder.
///
/// Values are stored short names: deduplicated, in mapping order, with
/// unrecognized identifiers already dropped. An empty `In` filter matches
/// nothing and an empty `NotIn` filter matches every non-null row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFilter {
    pub column: String,
    pub values: Vec<String>,
    pub mode: FilterMode,
}

impl StateFilter {
    pub fn new(column: impl Into<String>, values: Vec<String>, mode: FilterMode) -> Self {
        Self {
            column: column.into(),
            values,
            mode,
        }
    }

    /// Evaluate the filter against a stored value.
    ///
    /// Null never matches, in either mode.
    pub fn matches(&self, stored: Option<&str>) -> bool {
        let Some(stored) = stored else {
            return false;
        };
        let found = self.values.iter().any(|value| value == stored);
        match self.mode {
            FilterMode::In => found,
            FilterMode::NotIn => !found,
        }
    }

    /// The same column and values with the opposite mode.
    pub fn negate(self) -> Self {
        let mode = match self.mode {
            FilterMode::In => FilterMode::NotIn,
            FilterMode::NotIn => FilterMode::In,
        };
        Self { mode, ..self }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.mode {
            FilterMode::In => "IN",
            FilterMode::NotIn => "NOT IN",
        };
        let values = self
            .values
            .iter()
            .map(|value| format!("'{}'", value.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} {op} ({values})", self.column)
    }
}

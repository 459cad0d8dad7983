//! Operator map: public filter operators to query-builder operators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{PaginationError, PaginationResult};

/// Operators accepted when no map is configured. Each maps to itself.
pub const DEFAULT_OPERATORS: [&str; 6] = [">", ">=", "=", "<", "<=", "<>"];

/// Translation table from public operators to query-builder operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorMap {
    entries: BTreeMap<String, String>,
}

impl Default for OperatorMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_OPERATORS
                .iter()
                .map(|op| (op.to_string(), op.to_string()))
                .collect(),
        }
    }
}

impl OperatorMap {
    /// An empty map; every lookup fails until entries are added
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace a mapping
    pub fn with(mut self, public: impl Into<String>, operator: impl Into<String>) -> Self {
        self.entries.insert(public.into(), operator.into());
        self
    }

    /// Translate a public operator
    pub fn resolve(&self, operator: &str) -> PaginationResult<&str> {
        self.entries
            .get(operator)
            .map(String::as_str)
            .ok_or_else(|| PaginationError::UnknownOperator(operator.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OperatorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

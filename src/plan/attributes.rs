//! Attribute map: public node fields to physical columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{PaginationError, PaginationResult};

/// Translation table from public field names to storage column names.
///
/// Every order field and filter field must resolve through it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap {
    columns: BTreeMap<String, String>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map each field to a column of the same name
    pub fn identity<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields
            .into_iter()
            .map(|f| {
                let f = f.into();
                (f.clone(), f)
            })
            .collect()
    }

    /// Add or replace a mapping
    pub fn with(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    /// Column for `field`
    pub fn resolve(&self, field: &str) -> PaginationResult<&str> {
        self.columns
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| PaginationError::UnknownField(field.to_string()))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

//! Raw paging arguments as supplied by the API layer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::filter::FilterNode;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending (smallest first)
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    /// Descending (largest first)
    #[serde(alias = "DESC")]
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }

    /// SQL keyword
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(OrderDirection::Asc),
            "desc" => Ok(OrderDirection::Desc),
            _ => Err(format!("Invalid order direction: {}", s)),
        }
    }
}

/// Paging request.
///
/// `first`/`after` page forwards, `last`/`before` page backwards. Empty
/// strings are treated as absent, so an empty `endCursor` can be passed back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputArgs {
    /// Return rows before this cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,

    /// Return rows after this cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,

    /// Page size when paging forwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,

    /// Page size when paging backwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<i64>,

    /// Public field to order by (default `id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    /// Explicit sort direction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_dir: Option<OrderDirection>,

    /// Filter tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterNode>,

    /// Full-text search terms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl InputArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first(mut self, first: i64) -> Self {
        self.first = Some(first);
        self
    }

    pub fn with_last(mut self, last: i64) -> Self {
        self.last = Some(last);
        self
    }

    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn with_before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    pub fn with_order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn with_order_dir(mut self, direction: OrderDirection) -> Self {
        self.order_dir = Some(direction);
        self
    }

    pub fn with_filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub(crate) fn before_cursor(&self) -> Option<&str> {
        non_empty(&self.before)
    }

    pub(crate) fn after_cursor(&self) -> Option<&str> {
        non_empty(&self.after)
    }

    pub(crate) fn order_by_field(&self) -> Option<&str> {
        non_empty(&self.order_by)
    }

    pub(crate) fn search_terms(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

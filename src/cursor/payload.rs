//! Decoded cursor contents

use serde::{Deserialize, Serialize};

use crate::context::OrderDirection;
use crate::filter::FilterNode;

/// Everything needed to resume a result set from one row.
///
/// `position` is the 1-based index of the row within the fully ordered
/// result set at the time the cursor was minted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPayload {
    /// Sort direction of the result set the cursor was minted from
    pub initial_sort_direction: OrderDirection,

    /// Public field the result set is ordered by
    pub order_by: String,

    /// Filters in force when the cursor was minted
    #[serde(default)]
    pub filters: FilterNode,

    /// Row position within the ordered result set
    pub position: u64,

    /// Full-text search in force when the cursor was minted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl CursorPayload {
    pub fn new(
        initial_sort_direction: OrderDirection,
        order_by: impl Into<String>,
        filters: FilterNode,
        position: u64,
    ) -> Self {
        Self {
            initial_sort_direction,
            order_by: order_by.into(),
            filters,
            position,
            search: None,
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }
}

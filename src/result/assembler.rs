//! # Query Result
//!
//! Builds edges and page info from raw rows and the request's context.
//!
//! The plan fetches `limit + 1` rows. The extra row only signals that a
//! next page exists and is dropped here.

use std::fmt;
use std::sync::Arc;

use super::connection::{Connection, Edge, PageInfo};
use super::Row;
use crate::context::QueryContext;
use crate::errors::PaginationResult;
use crate::observability::{log_event, Event};

/// Caller projection from a raw row to a node
pub type NodeTransformer<N> = Arc<dyn Fn(Row) -> N + Send + Sync>;

/// One assembled page
#[derive(Clone, PartialEq)]
pub struct QueryResult<N = Row> {
    edges: Vec<Edge<N>>,
    page_info: PageInfo,
}

impl QueryResult<Row> {
    /// Assemble rows as nodes unchanged
    pub fn new(rows: Vec<Row>, context: &QueryContext) -> PaginationResult<Self> {
        Self::with_transformer(rows, context, |row| row)
    }
}

impl<N> QueryResult<N> {
    /// Assemble rows, projecting each retained row through `transform`
    pub fn with_transformer<F>(
        rows: Vec<Row>,
        context: &QueryContext,
        transform: F,
    ) -> PaginationResult<Self>
    where
        F: Fn(Row) -> N,
    {
        let raw_row_count = rows.len();
        let limit = context.limit();

        let nodes: Vec<N> = rows.into_iter().take(limit).map(transform).collect();

        let has_next_page = if context.is_paging_backwards() {
            context.index_position() > limit as u64 + 1
        } else {
            raw_row_count > limit
        };
        let has_previous_page = context.previous_cursor().is_some();

        let node_count = nodes.len() as u64;
        let edges = nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| {
                let position = edge_position(context, node_count, index as u64);
                let cursor = context.codec().encode(&context.cursor_payload(position))?;
                Ok(Edge { cursor, node })
            })
            .collect::<PaginationResult<Vec<_>>>()?;

        let page_info = PageInfo {
            has_previous_page,
            has_next_page,
            start_cursor: edges.first().map(|e| e.cursor.clone()).unwrap_or_default(),
            end_cursor: edges.last().map(|e| e.cursor.clone()).unwrap_or_default(),
        };

        let rows = raw_row_count.to_string();
        let edge_count = edges.len().to_string();
        log_event(
            Event::ResultAssembled,
            &[
                ("edges", edge_count.as_str()),
                ("has_next_page", if has_next_page { "true" } else { "false" }),
                ("has_previous_page", if has_previous_page { "true" } else { "false" }),
                ("rows", rows.as_str()),
            ],
        );

        Ok(Self { edges, page_info })
    }

    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.edges.iter().map(|edge| &edge.node)
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn has_next_page(&self) -> bool {
        self.page_info.has_next_page
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_info.has_previous_page
    }

    /// Cursor of the first edge, or `""`
    pub fn start_cursor(&self) -> &str {
        &self.page_info.start_cursor
    }

    /// Cursor of the last edge, or `""`
    pub fn end_cursor(&self) -> &str {
        &self.page_info.end_cursor
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn into_connection(self) -> Connection<N> {
        Connection {
            page_info: self.page_info,
            edges: self.edges,
        }
    }
}

impl<N> fmt::Debug for QueryResult<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("edges", &self.edges.len())
            .field("page_info", &self.page_info)
            .finish()
    }
}

/// Logical position of the `index`-th returned node.
///
/// Backward positions count down from the incoming cursor and stop at 0.
/// Forward positions fit because the context rejects cursors without room
/// for a full page.
fn edge_position(context: &QueryContext, node_count: u64, index: u64) -> u64 {
    if context.is_paging_backwards() {
        context
            .index_position()
            .saturating_sub(node_count)
            .saturating_sub(index)
    } else {
        context.index_position() + index + 1
    }
}

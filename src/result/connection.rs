//! Response shapes exposed to the API layer

use serde::{Deserialize, Serialize};

/// One node and the cursor that resumes the result set from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<N> {
    pub cursor: String,
    pub node: N,
}

/// Navigation state of one page.
///
/// Cursors are empty strings when the page has no edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: String,
    pub end_cursor: String,
}

/// `{pageInfo, edges}` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    pub page_info: PageInfo,
    pub edges: Vec<Edge<N>>,
}

impl<N> Connection<N> {
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

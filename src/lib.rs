//! cursor_pagination - Relay-style cursor pagination over pluggable query builders
//!
//! A request flows through four stages:
//!
//! 1. [`QueryContext`] validates the paging arguments and resolves limit,
//!    offset, ordering and filters (taken from the cursor when one is given)
//! 2. [`QueryPlanBuilder`] applies that context to a [`QueryBuilder`]
//! 3. the caller executes the query
//! 4. [`QueryResult`] turns the rows into edges and page info
//!
//! [`PaginationManager`] drives all four for one request.

pub mod cli;
pub mod config;
pub mod context;
pub mod cursor;
pub mod errors;
pub mod filter;
pub mod manager;
pub mod observability;
pub mod plan;
pub mod result;

pub use config::PaginationConfig;
pub use context::{ContextOptions, InputArgs, OrderDirection, QueryContext};
pub use cursor::{Base64JsonCodec, CursorCodec, CursorPayload, SignedCursorCodec};
pub use errors::{PaginationError, PaginationResult};
pub use filter::{FilterLeaf, FilterNode, OperatorMap};
pub use manager::{ManagerOptions, PaginationManager};
pub use plan::{
    AttributeMap, BuilderOptions, MemoryTable, QueryBuilder, QueryPlanBuilder, SearchOptions,
    SqlQuery,
};
pub use result::{Connection, Edge, PageInfo, QueryResult, Row};

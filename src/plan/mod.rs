//! # Query Planning
//!
//! Translates a resolved [`QueryContext`](crate::context::QueryContext) into
//! calls against an abstract query builder: limit (plus one lookahead row),
//! order, offset, filter predicates and optional full-text search.
//!
//! Two builders ship with the crate:
//!
//! - [`SqlQuery`] renders MySQL-flavoured SQL with `?` placeholders
//! - [`MemoryTable`] evaluates the plan over in-memory JSON rows
//!
//! Any other query DSL can be plugged in by implementing [`QueryBuilder`].

mod attributes;
mod builder;
mod memory;
mod planner;
mod sql;

pub use attributes::AttributeMap;
pub use builder::{Combinator, QueryBuilder};
pub use memory::{MemoryQuery, MemoryTable};
pub use planner::{BuilderOptions, FilterTransformer, QueryPlanBuilder, SearchOptions, RELEVANCE_ALIAS};
pub use sql::{RenderedQuery, SqlQuery};

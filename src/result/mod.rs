//! # Result Assembly
//!
//! Turns the raw rows of a planned query into Relay-style edges and page
//! info, minting one cursor per returned node.

mod assembler;
mod connection;

pub use assembler::{NodeTransformer, QueryResult};
pub use connection::{Connection, Edge, PageInfo};

/// A raw row: column name to value
pub type Row = serde_json::Map<String, serde_json::Value>;

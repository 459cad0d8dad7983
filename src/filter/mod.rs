//! # Filter Trees
//!
//! Recursive filter expressions supplied by callers, the operator map used to
//! translate public operators to query operators, and literal coercion for
//! string-typed filter values.

mod ast;
mod coerce;
mod operators;

pub use ast::{CompoundFilter, Connective, FilterLeaf, FilterNode};
pub use coerce::coerce_literal;
pub use operators::{OperatorMap, DEFAULT_OPERATORS};

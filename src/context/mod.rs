//! # Paging Context
//!
//! Raw paging arguments and the validated, resolved paging state derived
//! from them.

mod args;
mod context;

pub use args::{InputArgs, OrderDirection};
pub use context::{ContextOptions, QueryContext, DEFAULT_LIMIT, DEFAULT_ORDER_BY};

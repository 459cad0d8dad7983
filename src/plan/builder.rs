//! Query-builder capability set consumed by the plan builder.

use serde_json::Value;

use crate::context::OrderDirection;
use crate::errors::PaginationResult;

/// How a predicate joins the predicates added before it.
///
/// The first predicate of a builder (or group) stands alone regardless of
/// its combinator, except that `AndNot` still negates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Plain `where`
    Where,
    /// `and where`
    And,
    /// `or where`
    Or,
    /// `and where not`
    AndNot,
}

impl Combinator {
    /// SQL keyword(s) joining this predicate to the previous one
    pub fn joiner(&self) -> &'static str {
        match self {
            Combinator::Where | Combinator::And => "AND",
            Combinator::Or => "OR",
            Combinator::AndNot => "AND NOT",
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Combinator::AndNot)
    }
}

/// A query DSL the plan can be applied to.
///
/// Columns and operators arrive already translated through the attribute
/// and operator maps.
pub trait QueryBuilder: Sized {
    /// Cap the number of rows returned
    fn limit(&mut self, limit: usize);

    /// Order the rows by `column`
    fn order_by(&mut self, column: &str, direction: OrderDirection);

    /// Skip rows at the start of the ordered set
    fn offset(&mut self, offset: u64);

    /// Add a `column operator value` predicate
    fn predicate(&mut self, combinator: Combinator, column: &str, operator: &str, value: &Value);

    /// Add a parenthesised group of predicates built by `build` on a fresh
    /// sub-builder
    fn group<F>(&mut self, combinator: Combinator, build: F) -> PaginationResult<()>
    where
        F: FnOnce(&mut Self) -> PaginationResult<()>;

    /// Require a full-text match of `terms` against `columns`
    fn full_text(&mut self, columns: &[String], terms: &str, modifier: Option<&str>);

    /// Select the full-text relevance of each row under `alias`
    fn select_relevance(
        &mut self,
        columns: &[String],
        terms: &str,
        modifier: Option<&str>,
        alias: &str,
    );

    fn where_predicate(&mut self, column: &str, operator: &str, value: &Value) {
        self.predicate(Combinator::Where, column, operator, value);
    }

    fn and_where(&mut self, column: &str, operator: &str, value: &Value) {
        self.predicate(Combinator::And, column, operator, value);
    }

    fn or_where(&mut self, column: &str, operator: &str, value: &Value) {
        self.predicate(Combinator::Or, column, operator, value);
    }

    fn and_where_not(&mut self, column: &str, operator: &str, value: &Value) {
        self.predicate(Combinator::AndNot, column, operator, value);
    }

    fn and_where_group<F>(&mut self, build: F) -> PaginationResult<()>
    where
        F: FnOnce(&mut Self) -> PaginationResult<()>,
    {
        self.group(Combinator::And, build)
    }

    fn or_where_group<F>(&mut self, build: F) -> PaginationResult<()>
    where
        F: FnOnce(&mut Self) -> PaginationResult<()>,
    {
        self.group(Combinator::Or, build)
    }

    fn and_where_not_group<F>(&mut self, build: F) -> PaginationResult<()>
    where
        F: FnOnce(&mut Self) -> PaginationResult<()>,
    {
        self.group(Combinator::AndNot, build)
    }
}

//! # SQL Rendering
//!
//! A [`QueryBuilder`] that renders a single-table MySQL `SELECT` with `?`
//! placeholders. Values are always bound, never inlined. Identifiers are
//! backtick-quoted.

use serde::Serialize;
use serde_json::Value;

use super::builder::{Combinator, QueryBuilder};
use crate::context::OrderDirection;
use crate::errors::PaginationResult;

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Compare {
        column: String,
        operator: String,
        value: Value,
    },
    Group(Vec<(Combinator, Condition)>),
    FullText {
        columns: Vec<String>,
        terms: String,
        modifier: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Relevance {
    columns: Vec<String>,
    terms: String,
    modifier: Option<String>,
    alias: String,
}

/// SQL text plus bind parameters in placeholder order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// SELECT statement under construction
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    table: String,
    relevance: Option<Relevance>,
    conditions: Vec<(Combinator, Condition)>,
    order: Vec<(String, OrderDirection)>,
    limit: Option<usize>,
    offset: Option<u64>,
}

impl SqlQuery {
    /// Select every column of `table`
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            relevance: None,
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Render the statement
    pub fn render(&self) -> RenderedQuery {
        let mut sql = String::from("SELECT *");
        let mut params = Vec::new();

        if let Some(relevance) = &self.relevance {
            sql.push_str(", ");
            sql.push_str(&match_clause(
                &relevance.columns,
                relevance.modifier.as_deref(),
            ));
            sql.push_str(" AS ");
            sql.push_str(&quote_identifier(&relevance.alias));
            params.push(Value::String(relevance.terms.clone()));
        }

        sql.push_str(" FROM ");
        sql.push_str(&quote_identifier(&self.table));

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            render_conditions(&self.conditions, &mut sql, &mut params);
        }

        if !self.order.is_empty() {
            let order: Vec<String> = self
                .order
                .iter()
                .map(|(column, direction)| {
                    format!("{} {}", quote_identifier(column), direction.as_sql())
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::from(limit as u64));
        }

        if let Some(offset) = self.offset {
            sql.push_str(" OFFSET ?");
            params.push(Value::from(offset));
        }

        RenderedQuery { sql, params }
    }
}

impl QueryBuilder for SqlQuery {
    fn limit(&mut self, limit: usize) {
        self.limit = Some(limit);
    }

    fn order_by(&mut self, column: &str, direction: OrderDirection) {
        self.order.push((column.to_string(), direction));
    }

    fn offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    fn predicate(&mut self, combinator: Combinator, column: &str, operator: &str, value: &Value) {
        self.conditions.push((
            combinator,
            Condition::Compare {
                column: column.to_string(),
                operator: operator.to_string(),
                value: value.clone(),
            },
        ));
    }

    fn group<F>(&mut self, combinator: Combinator, build: F) -> PaginationResult<()>
    where
        F: FnOnce(&mut Self) -> PaginationResult<()>,
    {
        let mut sub = SqlQuery::new(self.table.clone());
        build(&mut sub)?;
        // An empty group would render as `()`
        if !sub.conditions.is_empty() {
            self.conditions
                .push((combinator, Condition::Group(sub.conditions)));
        }
        Ok(())
    }

    fn full_text(&mut self, columns: &[String], terms: &str, modifier: Option<&str>) {
        self.conditions.push((
            Combinator::And,
            Condition::FullText {
                columns: columns.to_vec(),
                terms: terms.to_string(),
                modifier: modifier.map(str::to_string),
            },
        ));
    }

    fn select_relevance(
        &mut self,
        columns: &[String],
        terms: &str,
        modifier: Option<&str>,
        alias: &str,
    ) {
        self.relevance = Some(Relevance {
            columns: columns.to_vec(),
            terms: terms.to_string(),
            modifier: modifier.map(str::to_string),
            alias: alias.to_string(),
        });
    }
}

fn render_conditions(
    conditions: &[(Combinator, Condition)],
    sql: &mut String,
    params: &mut Vec<Value>,
) {
    for (index, (combinator, condition)) in conditions.iter().enumerate() {
        if index == 0 {
            if combinator.is_negated() {
                sql.push_str("NOT ");
            }
        } else {
            sql.push(' ');
            sql.push_str(combinator.joiner());
            sql.push(' ');
        }
        render_condition(condition, sql, params);
    }
}

fn render_condition(condition: &Condition, sql: &mut String, params: &mut Vec<Value>) {
    match condition {
        Condition::Compare {
            column,
            operator,
            value,
        } if is_empty_list(value) => {
            // `IN ()` is not valid SQL; an empty list matches nothing, its
            // negation every non-null value
            if operator.trim().eq_ignore_ascii_case("not in") {
                sql.push_str(&quote_identifier(column));
                sql.push_str(" IS NOT NULL");
            } else {
                sql.push_str("1 = 0");
            }
        }
        Condition::Compare {
            column,
            operator,
            value,
        } => {
            sql.push_str(&quote_identifier(column));
            sql.push(' ');
            sql.push_str(operator);
            sql.push(' ');
            match value {
                Value::Array(items) => {
                    let placeholders = vec!["?"; items.len()].join(", ");
                    sql.push('(');
                    sql.push_str(&placeholders);
                    sql.push(')');
                    params.extend(items.iter().cloned());
                }
                other => {
                    sql.push('?');
                    params.push(other.clone());
                }
            }
        }
        Condition::Group(inner) => {
            sql.push('(');
            render_conditions(inner, sql, params);
            sql.push(')');
        }
        Condition::FullText {
            columns,
            terms,
            modifier,
        } => {
            sql.push_str(&match_clause(columns, modifier.as_deref()));
            params.push(Value::String(terms.clone()));
        }
    }
}

fn is_empty_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.is_empty())
}

fn match_clause(columns: &[String], modifier: Option<&str>) -> String {
    let columns: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
    match modifier {
        Some(modifier) => format!("MATCH ({}) AGAINST (? {})", columns.join(", "), modifier),
        None => format!("MATCH ({}) AGAINST (?)", columns.join(", ")),
    }
}

/// Quote `table.column` as `` `table`.`column` ``
fn quote_identifier(identifier: &str) -> String {
    identifier
        .split('.')
        .map(|part| format!("`{}`", part.replace('`', "``")))
        .collect::<Vec<_>>()
        .join(".")
}

//! # In-Memory Row Source
//!
//! Evaluates a plan over JSON rows held in memory. Useful for tests, fixtures
//! and small datasets. Row keys are physical column names.
//!
//! Predicates follow SQL precedence (`AND` binds tighter than `OR`), and a
//! comparison involving a missing or null column never matches. Sorting is
//! stable: `null < bool < number < string`, missing columns first.

use std::cmp::Ordering;

use serde_json::Value;

use super::builder::{Combinator, QueryBuilder};
use crate::context::OrderDirection;
use crate::errors::{PaginationError, PaginationResult};
use crate::result::Row;

/// Operators understood by [`MemoryQuery::execute`]
const SUPPORTED_OPERATORS: [&str; 13] = [
    "=", "<>", "!=", ">", ">=", "<", "<=", "like", "not like", "in", "not in", "is", "is not",
];

#[derive(Debug, Clone)]
enum Condition {
    Compare {
        column: String,
        operator: String,
        value: Value,
    },
    Group(Vec<(Combinator, Condition)>),
    FullText {
        columns: Vec<String>,
        terms: Vec<String>,
    },
}

/// A table of rows
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    rows: Vec<Row>,
}

impl MemoryTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build from a JSON array of objects
    pub fn from_json(value: Value) -> PaginationResult<Self> {
        let Value::Array(items) = value else {
            return Err(PaginationError::Config(
                "row data must be a JSON array".to_string(),
            ));
        };

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(row) => Ok(row),
                _ => Err(PaginationError::Config(format!(
                    "row {} is not a JSON object",
                    index
                ))),
            })
            .collect::<PaginationResult<Vec<Row>>>()?;

        Ok(Self { rows })
    }

    /// Start a query over every row
    pub fn query(&self) -> MemoryQuery<'_> {
        MemoryQuery::new(&self.rows)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A query over a [`MemoryTable`]
#[derive(Debug, Clone)]
pub struct MemoryQuery<'a> {
    rows: &'a [Row],
    conditions: Vec<(Combinator, Condition)>,
    order: Vec<(String, OrderDirection)>,
    limit: Option<usize>,
    offset: u64,
    relevance: Option<(Vec<String>, Vec<String>, String)>,
}

impl<'a> MemoryQuery<'a> {
    fn new(rows: &'a [Row]) -> Self {
        Self {
            rows,
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: 0,
            relevance: None,
        }
    }

    /// Run the query
    pub fn execute(&self) -> PaginationResult<Vec<Row>> {
        check_operators(&self.conditions)?;

        let mut matched: Vec<&Row> = self
            .rows
            .iter()
            .filter(|row| matches_all(&self.conditions, row))
            .collect();

        matched.sort_by(|a, b| {
            for (column, direction) in &self.order {
                let ordering = compare_for_sort(a.get(column), b.get(column));
                let ordering = match direction {
                    OrderDirection::Asc => ordering,
                    OrderDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = self.limit.unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|row| {
                let mut row = row.clone();
                if let Some((columns, terms, alias)) = &self.relevance {
                    row.insert(alias.clone(), Value::from(relevance(columns, terms, &row)));
                }
                row
            })
            .collect())
    }
}

impl<'a> QueryBuilder for MemoryQuery<'a> {
    fn limit(&mut self, limit: usize) {
        self.limit = Some(limit);
    }

    fn order_by(&mut self, column: &str, direction: OrderDirection) {
        self.order.push((column.to_string(), direction));
    }

    fn offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn predicate(&mut self, combinator: Combinator, column: &str, operator: &str, value: &Value) {
        self.conditions.push((
            combinator,
            Condition::Compare {
                column: column.to_string(),
                operator: operator.to_lowercase(),
                value: value.clone(),
            },
        ));
    }

    fn group<F>(&mut self, combinator: Combinator, build: F) -> PaginationResult<()>
    where
        F: FnOnce(&mut Self) -> PaginationResult<()>,
    {
        let mut sub = MemoryQuery::new(self.rows);
        build(&mut sub)?;
        if !sub.conditions.is_empty() {
            self.conditions
                .push((combinator, Condition::Group(sub.conditions)));
        }
        Ok(())
    }

    fn full_text(&mut self, columns: &[String], terms: &str, _modifier: Option<&str>) {
        self.conditions.push((
            Combinator::And,
            Condition::FullText {
                columns: columns.to_vec(),
                terms: search_terms(terms),
            },
        ));
    }

    fn select_relevance(
        &mut self,
        columns: &[String],
        terms: &str,
        _modifier: Option<&str>,
        alias: &str,
    ) {
        self.relevance = Some((columns.to_vec(), search_terms(terms), alias.to_string()));
    }
}

fn check_operators(conditions: &[(Combinator, Condition)]) -> PaginationResult<()> {
    for (_, condition) in conditions {
        match condition {
            Condition::Compare { operator, .. } => {
                if !SUPPORTED_OPERATORS.contains(&operator.as_str()) {
                    return Err(PaginationError::UnknownOperator(operator.clone()));
                }
            }
            Condition::Group(inner) => check_operators(inner)?,
            Condition::FullText { .. } => {}
        }
    }
    Ok(())
}

/// Evaluates a predicate list with `AND` binding tighter than `OR`
fn matches_all(conditions: &[(Combinator, Condition)], row: &Row) -> bool {
    if conditions.is_empty() {
        return true;
    }

    let mut any_term = false;
    let mut term: Option<bool> = None;

    for (combinator, condition) in conditions {
        let value = matches(condition, row);
        term = Some(match combinator {
            Combinator::Where | Combinator::And => term.unwrap_or(true) && value,
            Combinator::AndNot => term.unwrap_or(true) && !value,
            Combinator::Or => {
                if let Some(previous) = term {
                    any_term |= previous;
                }
                value
            }
        });
    }

    any_term || term.unwrap_or(true)
}

fn matches(condition: &Condition, row: &Row) -> bool {
    match condition {
        Condition::Compare {
            column,
            operator,
            value,
        } => compare(row.get(column).unwrap_or(&Value::Null), operator, value),
        Condition::Group(inner) => matches_all(inner, row),
        Condition::FullText { columns, terms } => relevance(columns, terms, row) > 0,
    }
}

fn compare(actual: &Value, operator: &str, expected: &Value) -> bool {
    match operator {
        "is" => actual.is_null() == expected.is_null(),
        "is not" => actual.is_null() != expected.is_null(),
        _ if actual.is_null() || expected.is_null() => false,
        "=" => values_equal(actual, expected),
        "<>" | "!=" => !values_equal(actual, expected),
        ">" => compare_values(actual, expected) == Some(Ordering::Greater),
        ">=" => matches!(
            compare_values(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        "<" => compare_values(actual, expected) == Some(Ordering::Less),
        "<=" => matches!(
            compare_values(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        "like" | "not like" => {
            let matched = match (actual.as_str(), expected.as_str()) {
                (Some(text), Some(pattern)) => like(text, pattern),
                _ => false,
            };
            matched == (operator == "like")
        }
        "in" | "not in" => {
            let contained = match expected {
                Value::Array(items) => items.iter().any(|item| values_equal(actual, item)),
                single => values_equal(actual, single),
            };
            contained == (operator == "in")
        }
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    if a.is_number() || b.is_number() {
        if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
            return x == y;
        }
    }
    a == b
}

/// Ordering for comparison predicates; `None` when the values don't compare
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ if a.is_number() || b.is_number() => as_number(a)?.partial_cmp(&as_number(b)?),
        _ => None,
    }
}

/// Total order for sorting
fn compare_for_sort(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => {
            let by_rank = rank(x).cmp(&rank(y));
            if by_rank != Ordering::Equal {
                return by_rank;
            }
            compare_values(x, y).unwrap_or(Ordering::Equal)
        }
    }
}

/// SQL LIKE: `%` matches any run, `_` any single character
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // On a mismatch, retry from the most recent `%` with one more char swallowed
    let (mut t, mut p) = (0, 0);
    let mut resume: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(&'%') => {
                resume = Some((p + 1, t));
                p += 1;
            }
            Some(&c) if c == '_' || c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match resume {
                Some((after_wildcard, swallowed)) => {
                    p = after_wildcard;
                    t = swallowed + 1;
                    resume = Some((after_wildcard, t));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}

/// Lowercased search words with boolean-mode operators stripped
fn search_terms(terms: &str) -> Vec<String> {
    terms
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| "+-*~<>()\"".contains(c))
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Number of (term, column) pairs where the column text contains the term
fn relevance(columns: &[String], terms: &[String], row: &Row) -> u64 {
    let mut hits = 0;
    for column in columns {
        let Some(text) = row.get(column).and_then(Value::as_str) else {
            continue;
        };
        let text = text.to_lowercase();
        hits += terms.iter().filter(|term| text.contains(term.as_str())).count() as u64;
    }
    hits
}

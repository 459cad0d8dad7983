//! # Query Plan Builder
//!
//! Applies a [`QueryContext`] to a [`QueryBuilder`]:
//!
//! 1. `limit(limit + 1)`: the extra row is a lookahead for `hasNextPage`
//! 2. `order_by(column of orderBy, or of id, direction)`
//! 3. `offset(offset)`
//! 4. filter tree, compiled recursively
//! 5. full-text search, when configured and requested
//!
//! Every field and operator is resolved before the builder is touched, so
//! an unknown name fails the whole plan and leaves the builder unchanged.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attributes::AttributeMap;
use super::builder::{Combinator, QueryBuilder};
use crate::context::{QueryContext, DEFAULT_ORDER_BY};
use crate::errors::{PaginationError, PaginationResult};
use crate::filter::{coerce_literal, Connective, FilterLeaf, FilterNode, OperatorMap};
use crate::observability::{log_event, Event};

/// Column alias of the selected full-text relevance
pub const RELEVANCE_ALIAS: &str = "_relevance";

/// Caller hook applied to every filter leaf before it is resolved
pub type FilterTransformer = Arc<dyn Fn(FilterLeaf) -> FilterLeaf + Send + Sync>;

/// Full-text search configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Physical columns covered by the full-text index
    pub columns: Vec<String>,

    /// Search modifier, e.g. `IN BOOLEAN MODE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

impl SearchOptions {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            modifier: None,
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }
}

/// Options for [`QueryPlanBuilder`]
#[derive(Clone, Default)]
pub struct BuilderOptions {
    /// Public operator to builder operator translation
    pub operators: OperatorMap,

    /// Hook applied to each leaf, after literal coercion
    pub filter_transformer: Option<FilterTransformer>,

    /// Coerce string values spelling literals (`"42"`, `"true"`, ...)
    pub coerce_value_literals: bool,

    /// Enables full-text search
    pub search: Option<SearchOptions>,
}

impl fmt::Debug for BuilderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderOptions")
            .field("operators", &self.operators)
            .field("filter_transformer", &self.filter_transformer.is_some())
            .field("coerce_value_literals", &self.coerce_value_literals)
            .field("search", &self.search)
            .finish()
    }
}

impl BuilderOptions {
    pub fn with_operators(mut self, operators: OperatorMap) -> Self {
        self.operators = operators;
        self
    }

    pub fn with_filter_transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(FilterLeaf) -> FilterLeaf + Send + Sync + 'static,
    {
        self.filter_transformer = Some(Arc::new(transformer));
        self
    }

    pub fn with_value_coercion(mut self, enabled: bool) -> Self {
        self.coerce_value_literals = enabled;
        self
    }

    pub fn with_search(mut self, search: SearchOptions) -> Self {
        self.search = Some(search);
        self
    }
}

/// A filter tree with every leaf resolved to columns and operators
enum Compiled {
    Predicate {
        column: String,
        operator: String,
        value: Value,
    },
    Branches(Vec<(Combinator, Compiled)>),
}

/// Builds queries from a paging context
pub struct QueryPlanBuilder<'a> {
    context: &'a QueryContext,
    attributes: &'a AttributeMap,
    options: BuilderOptions,
}

impl<'a> QueryPlanBuilder<'a> {
    pub fn new(context: &'a QueryContext, attributes: &'a AttributeMap) -> Self {
        Self::with_options(context, attributes, BuilderOptions::default())
    }

    pub fn with_options(
        context: &'a QueryContext,
        attributes: &'a AttributeMap,
        options: BuilderOptions,
    ) -> Self {
        Self {
            context,
            attributes,
            options,
        }
    }

    /// Apply the plan to `builder`
    pub fn build<B: QueryBuilder>(&self, builder: &mut B) -> PaginationResult<()> {
        let order_column = self.order_column()?;
        let filter = self.compile(self.context.filters())?;

        builder.limit(self.context.limit() + 1);
        builder.order_by(order_column, self.context.order_direction());
        builder.offset(self.context.offset());
        apply(&filter, builder)?;
        self.apply_search(builder);

        let limit = (self.context.limit() + 1).to_string();
        let offset = self.context.offset().to_string();
        log_event(
            Event::PlanBuilt,
            &[
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
                ("order_column", order_column),
            ],
        );

        Ok(())
    }

    /// Column of the order field, falling back to the column of `id`
    fn order_column(&self) -> PaginationResult<&'a str> {
        let field = self.context.order_by();
        self.attributes
            .resolve(field)
            .or_else(|_| self.attributes.resolve(DEFAULT_ORDER_BY))
            .map_err(|_| PaginationError::UnknownField(field.to_string()))
    }

    fn compile(&self, node: &FilterNode) -> PaginationResult<Compiled> {
        match node {
            FilterNode::Leaf(leaf) => self.compile_leaf(leaf),
            FilterNode::Compound(compound) => {
                let mut branches = Vec::new();
                for (connective, children) in compound.branches() {
                    let combinator = match connective {
                        Connective::And => Combinator::And,
                        Connective::Or => Combinator::Or,
                        Connective::Not => Combinator::AndNot,
                    };
                    for child in children {
                        branches.push((combinator, self.compile(child)?));
                    }
                }
                Ok(Compiled::Branches(branches))
            }
        }
    }

    fn compile_leaf(&self, leaf: &FilterLeaf) -> PaginationResult<Compiled> {
        let mut leaf = leaf.clone();
        if self.options.coerce_value_literals {
            leaf.value = coerce_literal(leaf.value);
        }
        if let Some(transform) = &self.options.filter_transformer {
            leaf = transform(leaf);
        }

        Ok(Compiled::Predicate {
            column: self.attributes.resolve(&leaf.field)?.to_string(),
            operator: self.options.operators.resolve(&leaf.operator)?.to_string(),
            value: leaf.value,
        })
    }

    fn apply_search<B: QueryBuilder>(&self, builder: &mut B) {
        let (Some(search), Some(terms)) = (&self.options.search, self.context.search()) else {
            return;
        };
        if search.columns.is_empty() {
            return;
        }

        let modifier = search.modifier.as_deref();
        builder.select_relevance(&search.columns, terms, modifier, RELEVANCE_ALIAS);
        builder.full_text(&search.columns, terms, modifier);
    }
}

fn apply<B: QueryBuilder>(compiled: &Compiled, builder: &mut B) -> PaginationResult<()> {
    match compiled {
        Compiled::Predicate {
            column,
            operator,
            value,
        } => {
            builder.where_predicate(column, operator, value);
            Ok(())
        }
        Compiled::Branches(branches) => {
            for (combinator, child) in branches {
                match child {
                    Compiled::Predicate {
                        column,
                        operator,
                        value,
                    } => builder.predicate(*combinator, column, operator, value),
                    Compiled::Branches(_) => {
                        builder.group(*combinator, |sub| apply(child, sub))?;
                    }
                }
            }
            Ok(())
        }
    }
}

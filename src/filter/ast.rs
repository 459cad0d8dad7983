//! # Filter Expression AST
//!
//! A filter is either a single comparison (`Leaf`) or a compound node holding
//! `and`, `or` and `not` branches, nestable to any depth.
//!
//! Wire format (JSON):
//!
//! ```text
//! Filter   := Leaf | Compound
//! Leaf     := {"field": string, "operator": string, "value": scalar | [scalar]}
//! Compound := {"and"?: [Filter], "or"?: [Filter], "not"?: [Filter]}
//! ```
//!
//! Leaf and compound keys never mix; such objects are rejected on decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{PaginationError, PaginationResult};

/// A filter tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    /// Single comparison
    Leaf(FilterLeaf),

    /// Boolean composition of child filters
    Compound(CompoundFilter),
}

/// A single comparison: `field operator value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterLeaf {
    /// Public (node) field name
    pub field: String,

    /// Public operator, translated through the operator map
    pub operator: String,

    /// Scalar or list of scalars
    pub value: Value,
}

/// Boolean composition of child filters.
///
/// All three branches may be present at once. An empty compound matches
/// everything. A branch given as `[]` is present but empty; `null` or a
/// missing key is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompoundFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<FilterNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<FilterNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Vec<FilterNode>>,
}

/// How a compound branch joins its children to the enclosing query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// Conjunction (`and`)
    And,
    /// Disjunction (`or`)
    Or,
    /// Negated conjunction (`not`)
    Not,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
            Connective::Not => "not",
        }
    }
}

impl Default for FilterNode {
    fn default() -> Self {
        FilterNode::empty()
    }
}

impl FilterLeaf {
    /// Create a new comparison
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }
}

impl CompoundFilter {
    /// Branches in the order they are compiled: `and`, `or`, `not`
    pub fn branches(&self) -> [(Connective, &[FilterNode]); 3] {
        [
            (Connective::And, self.and.as_deref().unwrap_or_default()),
            (Connective::Or, self.or.as_deref().unwrap_or_default()),
            (Connective::Not, self.not.as_deref().unwrap_or_default()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.branches()
            .iter()
            .all(|(_, children)| children.is_empty())
    }
}

impl FilterNode {
    /// The empty filter (no predicate)
    pub fn empty() -> Self {
        FilterNode::Compound(CompoundFilter::default())
    }

    /// Create a leaf comparison
    pub fn leaf(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        FilterNode::Leaf(FilterLeaf::new(field, operator, value))
    }

    /// Conjunction of `children`
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Compound(CompoundFilter {
            and: Some(children),
            ..Default::default()
        })
    }

    /// Disjunction of `children`
    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Compound(CompoundFilter {
            or: Some(children),
            ..Default::default()
        })
    }

    /// Negated conjunction of `children`
    pub fn not(children: Vec<FilterNode>) -> Self {
        FilterNode::Compound(CompoundFilter {
            not: Some(children),
            ..Default::default()
        })
    }

    /// True for a compound node with no branches
    pub fn is_empty(&self) -> bool {
        match self {
            FilterNode::Leaf(_) => false,
            FilterNode::Compound(compound) => compound.is_empty(),
        }
    }

    /// True when the top level carries an `and` or `or` branch.
    ///
    /// Such a filter may not accompany a cursor.
    pub fn has_and_or(&self) -> bool {
        match self {
            FilterNode::Leaf(_) => false,
            FilterNode::Compound(compound) => compound.and.is_some() || compound.or.is_some(),
        }
    }

    /// Every leaf in the tree, depth first
    pub fn leaves(&self) -> Vec<&FilterLeaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FilterLeaf>) {
        match self {
            FilterNode::Leaf(leaf) => out.push(leaf),
            FilterNode::Compound(compound) => {
                for (_, children) in compound.branches() {
                    for child in children {
                        child.collect_leaves(out);
                    }
                }
            }
        }
    }

    /// Checks that every leaf value is a scalar or a list of scalars
    pub fn check_values(&self) -> PaginationResult<()> {
        for leaf in self.leaves() {
            let valid = match &leaf.value {
                Value::Object(_) => false,
                Value::Array(items) => items
                    .iter()
                    .all(|item| !item.is_array() && !item.is_object()),
                _ => true,
            };
            if !valid {
                return Err(PaginationError::validation(format!(
                    "Filter value for `{}` must be a scalar or a list of scalars",
                    leaf.field
                )));
            }
        }
        Ok(())
    }
}

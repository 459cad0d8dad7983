//! Filter Compilation Tests
//!
//! Tests for turning paging context into builder calls:
//! - Fields resolve through the attribute map, operators through the operator map
//! - Compound filters nest as parenthesised groups
//! - Unknown names fail the plan before the builder is touched
//! - Literal coercion, leaf transformers and full-text search

use cursor_pagination::plan::RenderedQuery;
use cursor_pagination::{
    AttributeMap, BuilderOptions, FilterNode, InputArgs, OperatorMap, PaginationError,
    QueryContext, QueryPlanBuilder, SearchOptions, SqlQuery,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn attributes() -> AttributeMap {
    AttributeMap::new()
        .with("id", "id")
        .with("name", "full_name")
        .with("age", "age")
        .with("a", "a")
        .with("b", "b")
}

fn render(args: InputArgs, options: BuilderOptions) -> Result<RenderedQuery, PaginationError> {
    let context = QueryContext::new(&args)?;
    let attributes = attributes();
    let mut query = SqlQuery::new("users");
    QueryPlanBuilder::with_options(&context, &attributes, options).build(&mut query)?;
    Ok(query.render())
}

fn filter(value: Value) -> FilterNode {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// Resolution Tests
// =============================================================================

/// `name` targets the `full_name` column with equality against "Alice".
#[test]
fn test_leaf_targets_mapped_column() {
    let args = InputArgs::new().with_filter(filter(
        json!({"field": "name", "operator": "=", "value": "Alice"}),
    ));
    let rendered = render(args, BuilderOptions::default()).unwrap();

    assert_eq!(
        rendered.sql,
        "SELECT * FROM `users` WHERE `full_name` = ? ORDER BY `id` ASC LIMIT ? OFFSET ?"
    );
    assert_eq!(rendered.params, vec![json!("Alice"), json!(1001), json!(0)]);
}

/// Order field resolves through the map, falling back to the `id` column.
#[test]
fn test_order_column() {
    let rendered = render(
        InputArgs::new().with_last(5).with_order_by("name"),
        BuilderOptions::default(),
    )
    .unwrap();
    assert!(rendered.sql.contains("ORDER BY `full_name` DESC"));

    let rendered = render(
        InputArgs::new().with_order_by("email"),
        BuilderOptions::default(),
    )
    .unwrap();
    assert!(rendered.sql.contains("ORDER BY `id` ASC"));
}

/// Without an `id` mapping an unknown order field fails.
#[test]
fn test_order_column_without_id() {
    let context = QueryContext::new(&InputArgs::new().with_order_by("email")).unwrap();
    let attributes = AttributeMap::new().with("name", "full_name");
    let mut query = SqlQuery::new("users");

    let err = QueryPlanBuilder::new(&context, &attributes)
        .build(&mut query)
        .unwrap_err();
    assert_eq!(err, PaginationError::UnknownField("email".to_string()));
    assert_eq!(query.render().sql, "SELECT * FROM `users`");
}

/// Operators outside the map are rejected.
#[test]
fn test_operator_map() {
    let like = InputArgs::new().with_filter(FilterNode::leaf("name", "like", json!("A%")));

    let err = render(like.clone(), BuilderOptions::default()).unwrap_err();
    assert_eq!(err, PaginationError::UnknownOperator("like".to_string()));

    let options =
        BuilderOptions::default().with_operators(OperatorMap::default().with("like", "LIKE"));
    let rendered = render(like, options).unwrap();
    assert!(rendered.sql.contains("WHERE `full_name` LIKE ?"));
}

// =============================================================================
// Compound Filter Tests
// =============================================================================

/// A conjunction holding one predicate and one nested disjunction.
#[test]
fn test_nested_compound() {
    let args = InputArgs::new().with_filter(filter(json!({
        "and": [
            {"field": "a", "operator": ">", "value": "1"},
            {"or": [{"field": "b", "operator": "=", "value": "x"}]}
        ]
    })));
    let rendered = render(args, BuilderOptions::default()).unwrap();

    assert!(rendered.sql.contains("WHERE `a` > ? AND (`b` = ?)"));
    assert_eq!(&rendered.params[..2], &[json!("1"), json!("x")]);
}

/// `not` children are negated conjuncts.
#[test]
fn test_not_branch() {
    let args = InputArgs::new().with_filter(filter(json!({
        "and": [{"field": "age", "operator": ">=", "value": 18}],
        "not": [{"field": "name", "operator": "=", "value": "root"}]
    })));
    let rendered = render(args, BuilderOptions::default()).unwrap();
    assert!(rendered
        .sql
        .contains("WHERE `age` >= ? AND NOT `full_name` = ?"));
}

/// An empty filter tree adds no predicate.
#[test]
fn test_empty_filter() {
    let rendered = render(
        InputArgs::new().with_filter(filter(json!({}))),
        BuilderOptions::default(),
    )
    .unwrap();
    assert!(!rendered.sql.contains("WHERE"));
}

/// A failing leaf deep in the tree fails the whole plan.
#[test]
fn test_deep_unknown_field() {
    let args = InputArgs::new().with_filter(filter(json!({
        "or": [
            {"field": "a", "operator": "=", "value": 1},
            {"and": [{"not": [{"field": "secret", "operator": "=", "value": 1}]}]}
        ]
    })));
    let err = render(args, BuilderOptions::default()).unwrap_err();
    assert_eq!(err, PaginationError::UnknownField("secret".to_string()));
}

// =============================================================================
// Value Handling Tests
// =============================================================================

/// String literals are coerced when enabled.
#[test]
fn test_value_coercion() {
    let args = InputArgs::new().with_filter(filter(json!({
        "and": [
            {"field": "age", "operator": ">", "value": "30"},
            {"field": "name", "operator": "<>", "value": "null"}
        ]
    })));

    let plain = render(args.clone(), BuilderOptions::default()).unwrap();
    assert_eq!(&plain.params[..2], &[json!("30"), json!("null")]);

    let coerced = render(args, BuilderOptions::default().with_value_coercion(true)).unwrap();
    assert_eq!(&coerced.params[..2], &[json!(30), Value::Null]);
}

/// The transformer sees each leaf before resolution.
#[test]
fn test_filter_transformer() {
    let args = InputArgs::new().with_filter(FilterNode::leaf("fullName", "=", json!("alice")));
    let options = BuilderOptions::default().with_filter_transformer(|mut leaf| {
        if leaf.field == "fullName" {
            leaf.field = "name".to_string();
            leaf.value = json!(leaf.value.as_str().unwrap_or_default().to_uppercase());
        }
        leaf
    });

    let rendered = render(args, options).unwrap();
    assert!(rendered.sql.contains("`full_name` = ?"));
    assert_eq!(rendered.params[0], json!("ALICE"));
}

/// Object values are rejected up front.
#[test]
fn test_object_value_rejected() {
    let args = InputArgs::new().with_filter(FilterNode::leaf("name", "=", json!({"x": 1})));
    assert!(matches!(
        render(args, BuilderOptions::default()),
        Err(PaginationError::Validation(_))
    ));
}

// =============================================================================
// Search Tests
// =============================================================================

/// Search adds a relevance column and a full-text predicate.
#[test]
fn test_full_text_search() {
    let options = BuilderOptions::default()
        .with_search(SearchOptions::new(["bio"]).with_modifier("IN BOOLEAN MODE"));
    let args = InputArgs::new()
        .with_first(10)
        .with_search("+rust")
        .with_filter(FilterNode::leaf("age", ">", json!(18)));
    let rendered = render(args, options).unwrap();

    assert_eq!(
        rendered.sql,
        "SELECT *, MATCH (`bio`) AGAINST (? IN BOOLEAN MODE) AS `_relevance` FROM `users` \
         WHERE `age` > ? AND MATCH (`bio`) AGAINST (? IN BOOLEAN MODE) \
         ORDER BY `id` ASC LIMIT ? OFFSET ?"
    );
    assert_eq!(
        rendered.params,
        vec![json!("+rust"), json!(18), json!("+rust"), json!(11), json!(0)]
    );
}

/// Search terms without configured columns are ignored.
#[test]
fn test_search_without_columns() {
    let rendered = render(
        InputArgs::new().with_search("rust"),
        BuilderOptions::default(),
    )
    .unwrap();
    assert!(!rendered.sql.contains("MATCH"));
}

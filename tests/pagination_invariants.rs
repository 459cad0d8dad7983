//! Pagination Invariant Tests
//!
//! Tests for the paging contract:
//! - Contradictory arguments are rejected before any query is planned
//! - Forward pages fetch one lookahead row to detect a next page
//! - Backward pages never reach past the start of the result set
//! - Cursors round-trip exactly
//! - Accessors fail until rows are supplied

use cursor_pagination::cursor::{Base64JsonCodec, CursorCodec, CursorPayload};
use cursor_pagination::{
    AttributeMap, FilterNode, InputArgs, ManagerOptions, OrderDirection, PaginationError,
    PaginationManager, QueryContext, QueryPlanBuilder, QueryResult, Row, SqlQuery,
};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn rows(ids: impl IntoIterator<Item = i64>) -> Vec<Row> {
    ids.into_iter()
        .map(|id| {
            let mut row = Row::new();
            row.insert("id".to_string(), json!(id));
            row
        })
        .collect()
}

fn cursor(direction: OrderDirection, position: u64) -> String {
    Base64JsonCodec
        .encode(&CursorPayload::new(direction, "id", FilterNode::empty(), position))
        .unwrap()
}

fn decode(token: &str) -> CursorPayload {
    Base64JsonCodec.decode(token).unwrap()
}

fn is_validation_error(args: &InputArgs) -> bool {
    matches!(QueryContext::new(args), Err(PaginationError::Validation(_)))
}

// =============================================================================
// Validation Tests
// =============================================================================

/// `first` with `last` is rejected whatever else is set.
#[test]
fn test_first_and_last_always_rejected() {
    let variants = [
        InputArgs::new(),
        InputArgs::new().with_after(cursor(OrderDirection::Asc, 3)),
        InputArgs::new().with_before(cursor(OrderDirection::Asc, 3)),
        InputArgs::new().with_order_by("name"),
        InputArgs::new().with_filter(FilterNode::leaf("id", ">", json!(1))),
    ];

    for base in variants {
        let args = base.with_first(2).with_last(2);
        assert!(is_validation_error(&args), "{:?}", args);
    }
}

/// Page sizes must be positive.
#[test]
fn test_non_positive_sizes_rejected() {
    for size in [0, -1, -100] {
        assert!(is_validation_error(&InputArgs::new().with_first(size)));
        assert!(is_validation_error(&InputArgs::new().with_last(size)));
    }
}

/// Ordering and compound filters are frozen by the cursor.
#[test]
fn test_cursor_freezes_order_and_filters() {
    let after = cursor(OrderDirection::Asc, 2);

    assert!(is_validation_error(
        &InputArgs::new().with_after(after.clone()).with_order_by("name")
    ));
    assert!(is_validation_error(&InputArgs::new().with_after(after.clone()).with_filter(
        FilterNode::and(vec![FilterNode::leaf("id", ">", json!(1))])
    )));
    assert!(is_validation_error(&InputArgs::new().with_after(after.clone()).with_filter(
        FilterNode::or(vec![FilterNode::leaf("id", ">", json!(1))])
    )));

    // Present but empty branches still count
    for empty in [json!({"and": []}), json!({"or": []})] {
        let filter: FilterNode = serde_json::from_value(empty).unwrap();
        assert!(is_validation_error(
            &InputArgs::new().with_first(1).with_after(after.clone()).with_filter(filter)
        ));
    }
}

/// A malformed cursor is a decode error.
#[test]
fn test_malformed_cursor() {
    let result = QueryContext::new(&InputArgs::new().with_after("%%%"));
    assert!(matches!(result, Err(PaginationError::Decode(_))));
}

/// A well-formed cursor whose position leaves no room for the page is a
/// decode error, not an overflow.
#[test]
fn test_cursor_position_at_numeric_limit() {
    let variants = [
        InputArgs::new().with_first(2).with_after(cursor(OrderDirection::Asc, u64::MAX)),
        InputArgs::new().with_after(cursor(OrderDirection::Asc, u64::MAX - 5)),
        InputArgs::new().with_last(2).with_before(cursor(OrderDirection::Desc, u64::MAX)),
    ];

    for args in variants {
        let result = QueryContext::new(&args);
        assert!(matches!(result, Err(PaginationError::Decode(_))), "{:?}", args);
    }

    // Paging backwards from the top position stays in range
    let context = QueryContext::new(
        &InputArgs::new().with_last(2).with_before(cursor(OrderDirection::Asc, u64::MAX)),
    )
    .unwrap();
    let result = QueryResult::new(rows([1, 2, 3]), &context).unwrap();
    assert_eq!(decode(result.end_cursor()).position, u64::MAX - 3);
}

/// The largest accepted page size plans and assembles without overflow.
#[test]
fn test_largest_page_size() {
    let context = QueryContext::new(&InputArgs::new().with_first(i64::MAX)).unwrap();
    let mut query = SqlQuery::new("users");
    QueryPlanBuilder::new(&context, &AttributeMap::identity(["id"]))
        .build(&mut query)
        .unwrap();
    assert_eq!(query.render().params, vec![json!(i64::MAX as u64 + 1), json!(0)]);

    let result = QueryResult::new(rows([1, 2]), &context).unwrap();
    assert!(!result.has_next_page());
    assert_eq!(decode(result.end_cursor()).position, 2);
}

// =============================================================================
// Forward Paging Tests
// =============================================================================

/// `first: 2` over three rows keeps two and reports a next page.
#[test]
fn test_first_two_of_three() {
    let context = QueryContext::new(&InputArgs::new().with_first(2)).unwrap();
    let result = QueryResult::new(rows([1, 2, 3]), &context).unwrap();

    let ids: Vec<_> = result.nodes().map(|node| node["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2)]);
    assert!(result.has_next_page());
    assert!(!result.has_previous_page());
    assert_eq!(decode(result.start_cursor()).position, 1);
    assert_eq!(decode(result.end_cursor()).position, 2);
}

/// N+1 raw rows means a next page; N or fewer means none.
#[test]
fn test_lookahead_row_decides_next_page() {
    for n in 1..6 {
        let context = QueryContext::new(&InputArgs::new().with_first(n)).unwrap();

        let full = QueryResult::new(rows(1..=n + 1), &context).unwrap();
        assert!(full.has_next_page());
        assert_eq!(full.len(), n as usize);

        for count in 0..=n {
            let short = QueryResult::new(rows(1..=count), &context).unwrap();
            assert!(!short.has_next_page());
            assert_eq!(short.len(), count as usize);
        }
    }
}

// =============================================================================
// Backward Paging Tests
// =============================================================================

/// `last: N, before: P` resolves limit and offset against the cursor.
#[test]
fn test_backward_limit_and_offset() {
    for position in 1..12u64 {
        for n in 1..6i64 {
            let args = InputArgs::new()
                .with_last(n)
                .with_before(cursor(OrderDirection::Asc, position));
            let context = QueryContext::new(&args).unwrap();

            let limit = (n as u64).min(position - 1);
            assert!(context.is_paging_backwards());
            assert_eq!(context.limit() as u64, limit);
            assert_eq!(context.offset(), position.saturating_sub(limit + 1));

            let result = QueryResult::new(rows(1..=limit as i64 + 1), &context).unwrap();
            assert!(result.has_previous_page());
        }
    }
}

/// Paging forward against a descending cursor walks backwards.
#[test]
fn test_descending_cursor_flips_direction() {
    let args = InputArgs::new()
        .with_first(3)
        .with_after(cursor(OrderDirection::Desc, 8));
    let context = QueryContext::new(&args).unwrap();

    assert!(context.is_paging_backwards());
    assert_eq!(context.order_direction(), OrderDirection::Desc);
    assert_eq!(context.offset(), 4);
}

// =============================================================================
// Cursor Tests
// =============================================================================

/// Cursors minted from a result decode to the payload they were encoded from.
#[test]
fn test_minted_cursors_round_trip() {
    let filter = FilterNode::leaf("id", ">", json!(0));
    let args = InputArgs::new()
        .with_first(3)
        .with_order_by("id")
        .with_filter(filter.clone());
    let context = QueryContext::new(&args).unwrap();
    let result = QueryResult::new(rows([1, 2, 3, 4]), &context).unwrap();

    for (index, edge) in result.edges().iter().enumerate() {
        let payload = decode(&edge.cursor);
        assert_eq!(payload, context.cursor_payload(index as u64 + 1));
        assert_eq!(Base64JsonCodec.encode(&payload).unwrap(), edge.cursor);
        assert_eq!(payload.filters, filter);
    }
}

// =============================================================================
// State Tests
// =============================================================================

/// Reading the page before supplying rows is a state error.
#[test]
fn test_accessors_before_result() {
    let manager = PaginationManager::new(
        &InputArgs::new().with_first(2),
        AttributeMap::identity(["id"]),
        ManagerOptions::default(),
    )
    .unwrap();

    let err = manager.page_info().unwrap_err();
    assert_eq!(err.code(), "PAGINATION_STATE_VIOLATION");
    assert!(!err.is_request_error());
    assert!(manager.edges().is_err());
}

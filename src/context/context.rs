//! # Query Context
//!
//! Validates paging arguments and resolves the effective limit, offset,
//! ordering, filters and paging direction for one request.
//!
//! When a cursor is supplied, ordering, filters and search come from the
//! cursor, never from the arguments. This keeps forward and backward
//! traversal consistent over the same logical result set even when the
//! caller flips between `first` and `last`.

use std::fmt;
use std::sync::Arc;

use super::args::{InputArgs, OrderDirection};
use crate::cursor::{Base64JsonCodec, CursorCodec, CursorPayload};
use crate::errors::{PaginationError, PaginationResult};
use crate::filter::FilterNode;
use crate::observability::{log_event, Event};

/// Page size used when neither `first` nor `last` is given
pub const DEFAULT_LIMIT: usize = 1000;

/// Field ordered by when neither the arguments nor a cursor name one
pub const DEFAULT_ORDER_BY: &str = "id";

/// Options for building a [`QueryContext`]
#[derive(Clone)]
pub struct ContextOptions {
    /// Page size when neither `first` nor `last` is given
    pub default_limit: usize,

    /// Largest accepted `first`/`last` (unbounded when `None`)
    pub max_limit: Option<usize>,

    /// Codec used to decode the incoming cursor and mint new ones
    pub codec: Arc<dyn CursorCodec>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: None,
            codec: Arc::new(Base64JsonCodec),
        }
    }
}

impl fmt::Debug for ContextOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextOptions")
            .field("default_limit", &self.default_limit)
            .field("max_limit", &self.max_limit)
            .finish_non_exhaustive()
    }
}

impl ContextOptions {
    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = Some(max_limit);
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn CursorCodec>) -> Self {
        self.codec = codec;
        self
    }
}

/// Resolved paging state. Immutable once constructed.
#[derive(Clone)]
pub struct QueryContext {
    limit: usize,
    order_by: String,
    order_direction: OrderDirection,
    filters: FilterNode,
    search: Option<String>,
    offset: u64,
    index_position: u64,
    is_paging_backwards: bool,
    previous_cursor: Option<String>,
    codec: Arc<dyn CursorCodec>,
}

impl QueryContext {
    /// Build a context with default options
    pub fn new(args: &InputArgs) -> PaginationResult<Self> {
        Self::with_options(args, ContextOptions::default())
    }

    /// Validate `args` and resolve the paging state
    pub fn with_options(args: &InputArgs, options: ContextOptions) -> PaginationResult<Self> {
        if let Err(err) = validate(args, &options) {
            let reason = err.to_string();
            log_event(Event::ArgsRejected, &[("reason", reason.as_str())]);
            return Err(err);
        }

        let previous_cursor = args.before_cursor().or(args.after_cursor());
        let payload = match previous_cursor {
            Some(token) => match options.codec.decode(token) {
                Ok(payload) => Some(payload),
                Err(err) => {
                    let reason = err.to_string();
                    log_event(Event::CursorRejected, &[("reason", reason.as_str())]);
                    return Err(err);
                }
            },
            None => None,
        };

        let context = Self::resolve(args, payload, previous_cursor, options);
        if let Err(err) = context.check_bounds() {
            let reason = err.to_string();
            let event = match err {
                PaginationError::Decode(_) => Event::CursorRejected,
                _ => Event::ArgsRejected,
            };
            log_event(event, &[("reason", reason.as_str())]);
            return Err(err);
        }

        let limit = context.limit.to_string();
        let offset = context.offset.to_string();
        log_event(
            Event::ContextResolved,
            &[
                ("backwards", if context.is_paging_backwards { "true" } else { "false" }),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
                ("order_by", context.order_by.as_str()),
                ("order_dir", context.order_direction.as_str()),
            ],
        );

        Ok(context)
    }

    fn resolve(
        args: &InputArgs,
        payload: Option<CursorPayload>,
        previous_cursor: Option<&str>,
        options: ContextOptions,
    ) -> Self {
        let wants_backward = args.last.is_some() || args.before_cursor().is_some();
        let wants_forward = args.first.is_some() || args.after_cursor().is_some();

        let (index_position, order_by, order_direction, filters, search, is_paging_backwards) =
            match payload {
                Some(payload) => {
                    // Paging against the cursor's original sort means walking backwards
                    let backwards = match payload.initial_sort_direction {
                        OrderDirection::Asc => wants_backward,
                        OrderDirection::Desc => wants_forward,
                    };
                    (
                        payload.position,
                        payload.order_by,
                        payload.initial_sort_direction,
                        payload.filters,
                        payload.search,
                        backwards,
                    )
                }
                None => {
                    let direction = args.order_dir.unwrap_or(if wants_backward {
                        OrderDirection::Desc
                    } else {
                        OrderDirection::Asc
                    });
                    (
                        0,
                        args.order_by_field()
                            .unwrap_or(DEFAULT_ORDER_BY)
                            .to_string(),
                        direction,
                        args.filter.clone().unwrap_or_default(),
                        args.search_terms().map(str::to_string),
                        false,
                    )
                }
            };

        let requested = args
            .first
            .or(args.last)
            .map(|n| n as usize)
            .unwrap_or(options.default_limit);

        // Never reach back past the start of the result set
        let limit = if is_paging_backwards {
            requested.min(index_position.saturating_sub(1) as usize)
        } else {
            requested
        };

        let offset = if is_paging_backwards {
            index_position.saturating_sub(limit as u64 + 1)
        } else {
            index_position
        };

        Self {
            limit,
            order_by,
            order_direction,
            filters,
            search,
            offset,
            index_position,
            is_paging_backwards,
            previous_cursor: previous_cursor.map(str::to_string),
            codec: options.codec,
        }
    }

    /// Ensures `limit + 1` fits and, paging forwards, so does
    /// `index_position + limit + 1`. Backward positions only count down.
    fn check_bounds(&self) -> PaginationResult<()> {
        let fetch = self
            .limit
            .checked_add(1)
            .and_then(|fetch| u64::try_from(fetch).ok())
            .ok_or_else(|| {
                PaginationError::validation(format!("Page size {} is too large", self.limit))
            })?;

        if !self.is_paging_backwards && self.index_position.checked_add(fetch).is_none() {
            return Err(PaginationError::decode(format!(
                "cursor position {} is out of range",
                self.index_position
            )));
        }

        Ok(())
    }

    /// Requested page size (the plan fetches one more row)
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Public field the result set is ordered by
    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    pub fn order_direction(&self) -> OrderDirection {
        self.order_direction
    }

    pub fn filters(&self) -> &FilterNode {
        &self.filters
    }

    /// Full-text search terms, if any
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Rows to skip in the ordered result set
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Position recorded in the incoming cursor (0 without one)
    pub fn index_position(&self) -> u64 {
        self.index_position
    }

    /// True when traversing against the cursor's original sort direction
    pub fn is_paging_backwards(&self) -> bool {
        self.is_paging_backwards
    }

    /// The incoming `before`/`after` token
    pub fn previous_cursor(&self) -> Option<&str> {
        self.previous_cursor.as_deref()
    }

    /// Codec used to mint cursors for this request
    pub fn codec(&self) -> &dyn CursorCodec {
        self.codec.as_ref()
    }

    /// Cursor payload for the row at `position`
    pub fn cursor_payload(&self, position: u64) -> CursorPayload {
        CursorPayload::new(
            self.order_direction,
            self.order_by.clone(),
            self.filters.clone(),
            position,
        )
        .with_search(self.search.clone())
    }
}

impl fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("limit", &self.limit)
            .field("order_by", &self.order_by)
            .field("order_direction", &self.order_direction)
            .field("filters", &self.filters)
            .field("search", &self.search)
            .field("offset", &self.offset)
            .field("index_position", &self.index_position)
            .field("is_paging_backwards", &self.is_paging_backwards)
            .field("previous_cursor", &self.previous_cursor)
            .finish()
    }
}

/// Rejects contradictory arguments, first violation wins
fn validate(args: &InputArgs, options: &ContextOptions) -> PaginationResult<()> {
    let before = args.before_cursor().is_some();
    let after = args.after_cursor().is_some();
    let has_cursor = before || after;

    if args.first.is_some() && args.last.is_some() {
        return Err(PaginationError::validation("Can not mix `first` and `last`"));
    }
    if before && after {
        return Err(PaginationError::validation("Can not mix `before` and `after`"));
    }
    if before && args.first.is_some() {
        return Err(PaginationError::validation("Can not mix `before` and `first`"));
    }
    if after && args.last.is_some() {
        return Err(PaginationError::validation("Can not mix `after` and `last`"));
    }
    if has_cursor && (args.order_by_field().is_some() || args.order_dir.is_some()) {
        return Err(PaginationError::validation(
            "Can not use `orderBy` or `orderDir` with a cursor",
        ));
    }
    if has_cursor && args.filter.as_ref().map_or(false, FilterNode::has_and_or) {
        return Err(PaginationError::validation("Can not use filters with a cursor"));
    }
    if has_cursor && args.search_terms().is_some() {
        return Err(PaginationError::validation("Can not use `search` with a cursor"));
    }

    for size in [args.first, args.last].into_iter().flatten() {
        if size <= 0 {
            return Err(PaginationError::validation("Page size must be greater than 0"));
        }
        if let Some(max) = options.max_limit {
            if size as u64 > max as u64 {
                return Err(PaginationError::validation(format!(
                    "Page size {} exceeds maximum {}",
                    size, max
                )));
            }
        }
    }

    if !has_cursor {
        if let Some(filter) = &args.filter {
            filter.check_values()?;
        }
    }

    Ok(())
}

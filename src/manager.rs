//! # Pagination Manager
//!
//! Per-request orchestrator. Resolves the context from the paging
//! arguments, applies the plan to a caller's query builder, then assembles
//! the page once the caller supplies the fetched rows.
//!
//! ```ignore
//! let mut manager = PaginationManager::new(&args, attributes, ManagerOptions::default())?;
//! let mut query = SqlQuery::new("users");
//! manager.build_plan(&mut query)?;
//! let rows = run(query.render());
//! manager.supply_result(rows)?;
//! let page_info = manager.page_info()?;
//! ```

use std::fmt;
use std::sync::Arc;

use crate::context::{ContextOptions, InputArgs, QueryContext};
use crate::errors::{PaginationError, PaginationResult};
use crate::plan::{AttributeMap, BuilderOptions, MemoryTable, QueryBuilder, QueryPlanBuilder};
use crate::result::{Connection, Edge, NodeTransformer, PageInfo, QueryResult, Row};

/// Options for [`PaginationManager`]
#[derive(Debug, Clone, Default)]
pub struct ManagerOptions {
    pub context: ContextOptions,
    pub builder: BuilderOptions,
}

impl ManagerOptions {
    pub fn with_context(mut self, context: ContextOptions) -> Self {
        self.context = context;
        self
    }

    pub fn with_builder(mut self, builder: BuilderOptions) -> Self {
        self.builder = builder;
        self
    }
}

/// Paging state for one request
pub struct PaginationManager<N = Row> {
    context: QueryContext,
    attributes: AttributeMap,
    builder_options: BuilderOptions,
    transformer: NodeTransformer<N>,
    result: Option<QueryResult<N>>,
}

impl PaginationManager<Row> {
    /// Validate `args` and resolve the paging context
    pub fn new(
        args: &InputArgs,
        attributes: AttributeMap,
        options: ManagerOptions,
    ) -> PaginationResult<Self> {
        Self::with_transformer(args, attributes, options, |row| row)
    }
}

impl<N> PaginationManager<N> {
    /// Like [`PaginationManager::new`], projecting rows into nodes with
    /// `transform`
    pub fn with_transformer<F>(
        args: &InputArgs,
        attributes: AttributeMap,
        options: ManagerOptions,
        transform: F,
    ) -> PaginationResult<Self>
    where
        F: Fn(Row) -> N + Send + Sync + 'static,
    {
        let context = QueryContext::with_options(args, options.context)?;
        Ok(Self {
            context,
            attributes,
            builder_options: options.builder,
            transformer: Arc::new(transform),
            result: None,
        })
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Apply limit, order, offset and filters to `builder`
    pub fn build_plan<B: QueryBuilder>(&self, builder: &mut B) -> PaginationResult<()> {
        QueryPlanBuilder::with_options(&self.context, &self.attributes, self.builder_options.clone())
            .build(builder)
    }

    /// Assemble the page from the rows the plan fetched
    pub fn supply_result(&mut self, rows: Vec<Row>) -> PaginationResult<()> {
        let transform = Arc::clone(&self.transformer);
        let result = QueryResult::with_transformer(rows, &self.context, |row| transform(row))?;
        self.result = Some(result);
        Ok(())
    }

    /// Plan, run and assemble against an in-memory table
    pub fn fetch_from(&mut self, table: &MemoryTable) -> PaginationResult<()> {
        let mut query = table.query();
        self.build_plan(&mut query)?;
        let rows = query.execute()?;
        self.supply_result(rows)
    }

    /// The assembled page, if rows were supplied
    pub fn result(&self) -> Option<&QueryResult<N>> {
        self.result.as_ref()
    }

    pub fn page_info(&self) -> PaginationResult<&PageInfo> {
        self.supplied("page info").map(QueryResult::page_info)
    }

    pub fn edges(&self) -> PaginationResult<&[Edge<N>]> {
        self.supplied("edges").map(QueryResult::edges)
    }

    pub fn into_connection(self) -> PaginationResult<Connection<N>> {
        self.result
            .map(QueryResult::into_connection)
            .ok_or(PaginationError::State("the connection"))
    }

    fn supplied(&self, what: &'static str) -> PaginationResult<&QueryResult<N>> {
        self.result.as_ref().ok_or(PaginationError::State(what))
    }
}

impl<N> fmt::Debug for PaginationManager<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationManager")
            .field("context", &self.context)
            .field("attributes", &self.attributes)
            .field("builder_options", &self.builder_options)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SqlQuery;
    use serde_json::json;

    fn table() -> MemoryTable {
        MemoryTable::from_json(json!([
            {"id": 1, "name": "a"},
            {"id": 2, "name": "b"},
            {"id": 3, "name": "c"},
            {"id": 4, "name": "d"},
            {"id": 5, "name": "e"}
        ]))
        .unwrap()
    }

    fn attributes() -> AttributeMap {
        AttributeMap::identity(["id", "name"])
    }

    #[test]
    fn test_accessors_before_supply() {
        let manager = PaginationManager::new(
            &InputArgs::new().with_first(2),
            attributes(),
            ManagerOptions::default(),
        )
        .unwrap();

        assert_eq!(manager.page_info(), Err(PaginationError::State("page info")));
        assert!(matches!(manager.edges(), Err(PaginationError::State("edges"))));
        assert!(manager.result().is_none());
        assert!(manager.into_connection().is_err());
    }

    #[test]
    fn test_invalid_args_rejected() {
        let result = PaginationManager::new(
            &InputArgs::new().with_first(1).with_last(1),
            attributes(),
            ManagerOptions::default(),
        );
        assert!(matches!(result, Err(PaginationError::Validation(_))));
    }

    #[test]
    fn test_build_plan_renders_sql() {
        let manager = PaginationManager::new(
            &InputArgs::new().with_first(2),
            attributes(),
            ManagerOptions::default(),
        )
        .unwrap();
        let mut query = SqlQuery::new("nodes");
        manager.build_plan(&mut query).unwrap();

        let rendered = query.render();
        assert_eq!(
            rendered.sql,
            "SELECT * FROM `nodes` ORDER BY `id` ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(rendered.params, vec![json!(3), json!(0)]);
    }

    #[test]
    fn test_fetch_and_follow_cursor() {
        let table = table();
        let mut first = PaginationManager::new(
            &InputArgs::new().with_first(2),
            attributes(),
            ManagerOptions::default(),
        )
        .unwrap();
        first.fetch_from(&table).unwrap();
        let page_info = first.page_info().unwrap().clone();
        assert!(page_info.has_next_page);

        let mut second = PaginationManager::new(
            &InputArgs::new().with_first(2).with_after(page_info.end_cursor),
            attributes(),
            ManagerOptions::default(),
        )
        .unwrap();
        second.fetch_from(&table).unwrap();

        let ids: Vec<_> = second
            .edges()
            .unwrap()
            .iter()
            .map(|edge| edge.node["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(3), json!(4)]);
        assert!(second.page_info().unwrap().has_previous_page);
    }

    #[test]
    fn test_transformer() {
        let mut manager = PaginationManager::with_transformer(
            &InputArgs::new().with_first(3),
            attributes(),
            ManagerOptions::default(),
            |row| row["name"].as_str().unwrap_or_default().to_uppercase(),
        )
        .unwrap();
        manager.fetch_from(&table()).unwrap();

        let connection = manager.into_connection().unwrap();
        let names: Vec<_> = connection.nodes().cloned().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}

//! # Configuration
//!
//! JSON configuration file for a paginated node type: the table, the
//! attribute and operator maps, limits, search and cursor signing.
//!
//! ```json
//! {
//!     "table": "users",
//!     "attributes": {"id": "id", "name": "full_name"},
//!     "max_limit": 100,
//!     "search": {"columns": ["bio"], "modifier": "IN BOOLEAN MODE"},
//!     "cursor_secret": "change-me"
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{ContextOptions, DEFAULT_LIMIT};
use crate::cursor::{Base64JsonCodec, CursorCodec, SignedCursorCodec};
use crate::errors::{PaginationError, PaginationResult};
use crate::filter::OperatorMap;
use crate::manager::ManagerOptions;
use crate::observability::{log_event, Event, Logger, Severity};
use crate::plan::{AttributeMap, BuilderOptions, SearchOptions};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Table rendered into SQL plans
    #[serde(default = "default_table")]
    pub table: String,

    /// Page size when neither `first` nor `last` is given
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest accepted `first`/`last`
    #[serde(default)]
    pub max_limit: Option<usize>,

    /// Public field to column map (required)
    pub attributes: AttributeMap,

    /// Public operator to query operator map
    #[serde(default)]
    pub operators: OperatorMap,

    #[serde(default)]
    pub coerce_value_literals: bool,

    /// Full-text search columns
    #[serde(default)]
    pub search: Option<SearchOptions>,

    /// Signs cursors when set
    #[serde(default, skip_serializing)]
    pub cursor_secret: Option<String>,

    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_table() -> String {
    "nodes".to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_log_level() -> Severity {
    Severity::Warn
}

impl PaginationConfig {
    /// A config with defaults for everything but the attribute map
    pub fn new(attributes: AttributeMap) -> Self {
        Self {
            table: default_table(),
            default_limit: default_limit(),
            max_limit: None,
            attributes,
            operators: OperatorMap::default(),
            coerce_value_literals: false,
            search: None,
            cursor_secret: None,
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> PaginationResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| PaginationError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_json(&content)?;

        let path = path.display().to_string();
        let attributes = config.attributes.len().to_string();
        log_event(
            Event::ConfigLoaded,
            &[
                ("attributes", attributes.as_str()),
                ("path", path.as_str()),
                ("table", config.table.as_str()),
            ],
        );

        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> PaginationResult<Self> {
        let config: PaginationConfig = serde_json::from_str(content)
            .map_err(|e| PaginationError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> PaginationResult<()> {
        if self.table.trim().is_empty() {
            return Err(PaginationError::Config("table must not be empty".to_string()));
        }

        if self.default_limit == 0 {
            return Err(PaginationError::Config("default_limit must be > 0".to_string()));
        }

        if self.max_limit == Some(0) {
            return Err(PaginationError::Config("max_limit must be > 0".to_string()));
        }

        if self.attributes.is_empty() {
            return Err(PaginationError::Config(
                "attributes must map at least one field".to_string(),
            ));
        }

        if let Some(search) = &self.search {
            if search.columns.is_empty() {
                return Err(PaginationError::Config(
                    "search.columns must name at least one column".to_string(),
                ));
            }
        }

        if matches!(&self.cursor_secret, Some(secret) if secret.is_empty()) {
            return Err(PaginationError::Config(
                "cursor_secret must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the process-wide log threshold to `log_level`
    pub fn apply_log_level(&self) {
        Logger::set_min_severity(self.log_level);
    }

    /// Cursor codec: signed when a secret is configured
    pub fn codec(&self) -> Arc<dyn CursorCodec> {
        match &self.cursor_secret {
            Some(secret) => Arc::new(SignedCursorCodec::new(secret.as_bytes())),
            None => Arc::new(Base64JsonCodec),
        }
    }

    pub fn context_options(&self) -> ContextOptions {
        let options = ContextOptions::default()
            .with_default_limit(self.default_limit)
            .with_codec(self.codec());
        match self.max_limit {
            Some(max_limit) => options.with_max_limit(max_limit),
            None => options,
        }
    }

    pub fn builder_options(&self) -> BuilderOptions {
        let options = BuilderOptions::default()
            .with_operators(self.operators.clone())
            .with_value_coercion(self.coerce_value_literals);
        match &self.search {
            Some(search) => options.with_search(search.clone()),
            None => options,
        }
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions::default()
            .with_context(self.context_options())
            .with_builder(self.builder_options())
    }
}

//! CLI command implementations
//!
//! Every command loads the configuration first, then reads its request
//! from stdin and writes exactly one JSON response to stdout.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::config::PaginationConfig;
use crate::context::{InputArgs, QueryContext};
use crate::manager::PaginationManager;
use crate::plan::{MemoryTable, SqlQuery};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args.
///
/// Failures are reported on stdout as an error response and returned.
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Plan { config } => plan(&config),
        Command::Page { config, data } => page(&config, &data),
        Command::Decode { config, token } => decode(&config, &token),
    };

    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }

    result
}

/// Print the resolved context and the SQL plan for the arguments on stdin
pub fn plan(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let args = read_args()?;
    write_response(plan_response(&config, &args)?)
}

/// Page through the rows of `data_path` with the arguments on stdin
pub fn page(config_path: &Path, data_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let table = load_rows(data_path)?;
    let args = read_args()?;
    write_response(page_response(&config, &args, &table)?)
}

/// Print the payload of `token`
pub fn decode(config_path: &Path, token: &str) -> CliResult<()> {
    let config = load_config(config_path)?;
    write_response(decode_response(&config, token)?)
}

/// `{context, query}` for the given arguments
pub fn plan_response(config: &PaginationConfig, args: &InputArgs) -> CliResult<Value> {
    let manager =
        PaginationManager::new(args, config.attributes.clone(), config.manager_options())?;

    let mut query = SqlQuery::new(config.table.clone());
    manager.build_plan(&mut query)?;

    Ok(json!({
        "context": context_json(manager.context()),
        "query": query.render(),
    }))
}

/// `{pageInfo, edges}` for the given arguments over `table`
pub fn page_response(
    config: &PaginationConfig,
    args: &InputArgs,
    table: &MemoryTable,
) -> CliResult<Value> {
    let mut manager =
        PaginationManager::new(args, config.attributes.clone(), config.manager_options())?;
    manager.fetch_from(table)?;

    Ok(serde_json::to_value(manager.into_connection()?)?)
}

/// Decoded payload of `token`
pub fn decode_response(config: &PaginationConfig, token: &str) -> CliResult<Value> {
    let payload = config.codec().decode(token)?;
    Ok(serde_json::to_value(payload)?)
}

fn load_config(path: &Path) -> CliResult<PaginationConfig> {
    let config = PaginationConfig::load(path)?;
    config.apply_log_level();
    Ok(config)
}

fn read_args() -> CliResult<InputArgs> {
    let request = read_request()?;
    serde_json::from_value(request)
        .map_err(|e| CliError::invalid_input(format!("Invalid paging arguments: {}", e)))
}

fn load_rows(path: &Path) -> CliResult<MemoryTable> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read data file: {}", e)))?;
    let rows: Value = serde_json::from_str(&content)?;
    Ok(MemoryTable::from_json(rows)?)
}

fn context_json(context: &QueryContext) -> Value {
    json!({
        "limit": context.limit(),
        "offset": context.offset(),
        "orderBy": context.order_by(),
        "orderDirection": context.order_direction(),
        "filters": context.filters(),
        "search": context.search(),
        "indexPosition": context.index_position(),
        "isPagingBackwards": context.is_paging_backwards(),
    })
}

//! CLI module for cursor pagination
//!
//! Provides command-line interface for:
//! - plan: Resolve paging arguments and render the SQL plan
//! - page: Page through rows loaded from a JSON file
//! - decode: Inspect a cursor token

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{decode, decode_response, page, page_response, plan, plan_response, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_request, read_request, write_error, write_response};

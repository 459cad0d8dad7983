//! cursor-pagination CLI entry point
//!
//! Parses arguments and dispatches to the CLI module. Errors have already
//! been written to stdout as a JSON error response; they are repeated on
//! stderr and the process exits non-zero.

use cursor_pagination::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

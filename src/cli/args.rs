//! CLI argument definitions using clap
//!
//! Commands:
//! - cursor-pagination plan --config <path>
//! - cursor-pagination page --config <path> --data <rows.json>
//! - cursor-pagination decode --config <path> <token>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cursor-based pagination: plan queries, assemble pages, inspect cursors
#[derive(Parser, Debug)]
#[command(name = "cursor-pagination")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read paging arguments from stdin and print the resolved plan as SQL
    Plan {
        /// Path to configuration file
        #[arg(long, default_value = "./pagination.json")]
        config: PathBuf,
    },

    /// Read paging arguments from stdin and page through a JSON row file
    Page {
        /// Path to configuration file
        #[arg(long, default_value = "./pagination.json")]
        config: PathBuf,

        /// JSON array of row objects
        #[arg(long)]
        data: PathBuf,
    },

    /// Print the payload of a cursor
    Decode {
        /// Path to configuration file
        #[arg(long, default_value = "./pagination.json")]
        config: PathBuf,

        /// Cursor token
        token: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

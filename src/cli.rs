//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for shortledger using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::services::DEFAULT_LIMIT;

/// Shortledger - URL shortener backed by a single JSON ledger
#[derive(Parser)]
#[command(name = "shortledger")]
#[command(version)]
#[command(about = "URL shortener backed by a single JSON ledger", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Shorten a URL and print the record as JSON
    Shorten {
        /// URL to shorten
        url: String,
    },

    /// Print the original URL behind a short code
    Resolve {
        /// Short code to look up
        code: String,
    },

    /// Print the most shortened domains
    Top {
        /// Number of domains to show
        #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
        limit: i32,
    },

    /// List every record in the ledger
    List,

    /// Generate example configuration file
    ConfigGen {
        /// Output path (default: config.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

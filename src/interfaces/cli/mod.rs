//! CLI interface module
//!
//! One-shot commands that run the ledger operations directly against the
//! configured store.

pub mod commands;

use std::fmt;

use crate::cli::Commands;
use crate::errors::ShortledgerError;
use crate::runtime::lifetime::StartupContext;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
    Ledger(ShortledgerError),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
            CliError::Ledger(err) => err.format_simple(),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
            CliError::Ledger(err) => err.format_colored(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ShortledgerError> for CliError {
    fn from(err: ShortledgerError) -> Self {
        CliError::Ledger(err)
    }
}

/// Run a CLI command against an initialized context
pub async fn run_cli_command(cmd: Commands, context: &StartupContext) -> Result<(), CliError> {
    match cmd {
        Commands::Shorten { url } => commands::shorten_url(&context.ledger, url).await,
        Commands::Resolve { code } => commands::resolve_code(&context.resolver, code).await,
        Commands::Top { limit } => commands::top_domains(&context.aggregator, i64::from(limit)).await,
        Commands::List => commands::list_records(&context.ledger).await,
        Commands::ConfigGen { output_path, force } => {
            commands::generate_config(output_path, force).await
        }
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a CLI command".to_string(),
        )),
    }
}

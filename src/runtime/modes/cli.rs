//! CLI mode
//!
//! Builds the store from configuration and delegates to the command
//! implementations.

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::interfaces::cli::{self, CliError};
use crate::runtime::lifetime;

/// Run one CLI command
///
/// `config-gen` needs no store and runs before startup.
pub async fn run_cli(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    if let Commands::ConfigGen { output_path, force } = cmd {
        return cli::commands::generate_config(output_path, force).await;
    }

    let context = lifetime::prepare_startup(config)
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))?;

    cli::run_cli_command(cmd, &context).await
}

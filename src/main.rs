use clap::Parser;
#[cfg(feature = "server")]
use tracing::error;

use shortledger::cli::{Cli, Commands};
use shortledger::config::{StaticConfig, get_config, init_config};
#[cfg(any(feature = "server", feature = "cli"))]
use shortledger::runtime::modes;
#[cfg(any(feature = "server", feature = "cli"))]
use shortledger::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());
    let config = get_config();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        cmd => run_command(cmd, &config).await,
    }
}

#[cfg(feature = "server")]
async fn serve(config: &StaticConfig) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }

    let _guard = init_logging(&config.logging);
    if let Err(e) = modes::run_server().await {
        error!("Server exited with error: {:#}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve(_config: &StaticConfig) -> anyhow::Result<()> {
    anyhow::bail!("this binary was built without the `server` feature")
}

#[cfg(feature = "cli")]
async fn run_command(cmd: Commands, config: &StaticConfig) -> anyhow::Result<()> {
    // CLI 输出走 stdout，只保留告警级别日志
    let mut logging = config.logging.clone();
    logging.level = "warn".to_string();
    let guard = init_logging(&logging);

    let result = modes::run_cli(cmd, config).await;
    drop(guard);
    if let Err(e) = result {
        eprintln!("{}", e.format_simple());
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
async fn run_command(_cmd: Commands, _config: &StaticConfig) -> anyhow::Result<()> {
    anyhow::bail!("this binary was built without the `cli` feature")
}

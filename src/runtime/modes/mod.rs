//! `serve` runs the HTTP server, every other subcommand is a one-shot
//! ledger command.

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::{configure_app, run_server};

#[cfg(feature = "cli")]
pub use cli::run_cli;

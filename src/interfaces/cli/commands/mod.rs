//! CLI command implementations

mod config_gen;
mod list;
mod resolve;
mod shorten;
mod top;

pub use config_gen::generate_config;
pub use list::list_records;
pub use resolve::resolve_code;
pub use shorten::shorten_url;
pub use top::top_domains;

use serde::Serialize;

use crate::interfaces::cli::CliError;

/// 以缩进 JSON 打印到 stdout
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::CommandError(format!("Failed to render JSON: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

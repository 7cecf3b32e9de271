//! Resolve command

use crate::interfaces::cli::CliError;
use crate::services::RedirectResolver;

pub async fn resolve_code(resolver: &RedirectResolver, code: String) -> Result<(), CliError> {
    let target = resolver.resolve(&code).await?;
    println!("{}", target);
    Ok(())
}

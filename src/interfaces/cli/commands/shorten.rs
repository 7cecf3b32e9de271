//! Shorten command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::UrlLedger;

pub async fn shorten_url(ledger: &UrlLedger, url: String) -> Result<(), CliError> {
    let outcome = ledger.shorten(&url).await?;

    if outcome.created {
        eprintln!(
            "{} Added {} -> {}",
            "✓".bold().green(),
            outcome.record.short_code.cyan(),
            outcome.record.original_url.blue().underline()
        );
    } else {
        eprintln!(
            "{} Already shortened as {}",
            "ℹ".bold().blue(),
            outcome.record.short_code.cyan()
        );
    }

    super::print_json(&outcome.record)
}

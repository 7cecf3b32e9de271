//! List ledger command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::UrlLedger;

pub async fn list_records(ledger: &UrlLedger) -> Result<(), CliError> {
    let records = ledger.snapshot().await?;

    if records.is_empty() {
        println!("{} No short URLs found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Short URL list:".bold().green());
    println!();
    for record in &records {
        println!(
            "  {} -> {} {}",
            record.short_code.cyan(),
            record.original_url.blue().underline(),
            format!("({})", record.domain).dimmed()
        );
    }
    println!();
    println!(
        "{} Total {} short URLs",
        "ℹ".bold().blue(),
        records.len().to_string().green()
    );
    Ok(())
}

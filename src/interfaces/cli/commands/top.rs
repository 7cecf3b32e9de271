//! Top domains command

use crate::interfaces::cli::CliError;
use crate::services::MetricsAggregator;

pub async fn top_domains(aggregator: &MetricsAggregator, limit: i64) -> Result<(), CliError> {
    let report = aggregator.report(limit).await?;
    super::print_json(&report)
}

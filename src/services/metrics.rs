//! Top-N domain report
//!
//! Ranking is by descending count. Domains with equal counts keep the order
//! in which they first appear in the ledger.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::UrlLedger;
use crate::errors::{Result, ShortledgerError};
use crate::storage::{DomainCount, UrlRecord};

/// HTTP 和 CLI 都只接受 i32 范围内的 limit
pub const DEFAULT_LIMIT: i32 = 3;
pub const INVALID_LIMIT_MESSAGE: &str = "specify a valid integer value";
pub const NO_METRICS_MESSAGE: &str = "metrics data does not exist";

/// Count records per domain and keep the `limit` most frequent
///
/// A `limit` of zero or below yields an empty report.
pub fn top_domains<'a, I>(records: I, limit: i64) -> Vec<DomainCount>
where
    I: IntoIterator<Item = &'a UrlRecord>,
{
    if limit <= 0 {
        return Vec::new();
    }

    // index 记录首次出现的位置，保证并列时按插入顺序
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<DomainCount> = Vec::new();
    for record in records {
        match index.get(record.domain.as_str()) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                index.insert(record.domain.as_str(), counts.len());
                counts.push(DomainCount {
                    domain: record.domain.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    counts
}

/// Parse the `limit` query parameter; absent means `DEFAULT_LIMIT`
pub fn parse_limit(raw: Option<&str>) -> Result<i64> {
    match raw {
        None => Ok(i64::from(DEFAULT_LIMIT)),
        Some(value) => value.parse::<i32>().map(i64::from).map_err(|e| {
            debug!("Invalid limit '{}': {}", value, e);
            ShortledgerError::invalid_input(INVALID_LIMIT_MESSAGE)
        }),
    }
}

pub struct MetricsAggregator {
    ledger: Arc<UrlLedger>,
}

impl MetricsAggregator {
    pub fn new(ledger: Arc<UrlLedger>) -> Self {
        Self { ledger }
    }

    /// Top domains over the current ledger. `NotFound` if it was never written.
    pub async fn report(&self, limit: i64) -> Result<Vec<DomainCount>> {
        let ledger = self
            .ledger
            .load()
            .await?
            .ok_or_else(|| ShortledgerError::not_found(NO_METRICS_MESSAGE))?;
        Ok(top_domains(&ledger, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(domains: &[&str]) -> Vec<UrlRecord> {
        domains
            .iter()
            .enumerate()
            .map(|(i, d)| UrlRecord {
                original_url: format!("https://www.{}.com/{}", d, i),
                short_code: format!("code{}", i),
                domain: d.to_string(),
            })
            .collect()
    }

    fn entry(domain: &str, count: usize) -> DomainCount {
        DomainCount {
            domain: domain.to_string(),
            count,
        }
    }

    #[test]
    fn test_ranking_limits() {
        let data = records(&["google", "reddit", "google", "facebook", "facebook", "google"]);
        assert_eq!(
            top_domains(&data, 3),
            vec![entry("google", 3), entry("facebook", 2), entry("reddit", 1)]
        );
        assert_eq!(
            top_domains(&data, 2),
            vec![entry("google", 3), entry("facebook", 2)]
        );
        assert_eq!(top_domains(&data, 1), vec![entry("google", 3)]);
        assert!(top_domains(&data, 0).is_empty());
        assert!(top_domains(&data, -5).is_empty());
        assert_eq!(top_domains(&data, 100).len(), 3);
    }

    #[test]
    fn test_ties_keep_first_appearance_order() {
        let data = records(&["zeta", "alpha", "mid", "alpha", "zeta", "mid", "solo"]);
        assert_eq!(
            top_domains(&data, 4),
            vec![
                entry("zeta", 2),
                entry("alpha", 2),
                entry("mid", 2),
                entry("solo", 1)
            ]
        );
        assert_eq!(
            top_domains(&data, 2),
            vec![entry("zeta", 2), entry("alpha", 2)]
        );
    }

    #[test]
    fn test_empty_records() {
        assert!(top_domains(&Vec::<UrlRecord>::new(), 2).is_empty());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), 3);
        assert_eq!(parse_limit(Some("5")).unwrap(), 5);
        assert_eq!(parse_limit(Some("-1")).unwrap(), -1);
        assert_eq!(parse_limit(Some("+2")).unwrap(), 2);
        for bad in ["", "abc", "1.5", "99999999999"] {
            assert_eq!(
                parse_limit(Some(bad)).unwrap_err(),
                ShortledgerError::invalid_input(INVALID_LIMIT_MESSAGE),
                "limit {:?}",
                bad
            );
        }
    }
}

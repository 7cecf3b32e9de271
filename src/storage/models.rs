use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortledgerError};

/// One shortened URL. Field names match the persisted ledger and the
/// `/shorten` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    #[serde(rename = "url")]
    pub original_url: String,
    #[serde(rename = "shorturl")]
    pub short_code: String,
    pub domain: String,
}

/// Derived metrics entry, never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: usize,
}

/// The full ordered record collection stored under the ledger key
///
/// Records are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<UrlRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<UrlRecord>) -> Self {
        Self { records }
    }

    /// Decode the persisted JSON array. A literal `null` is an empty ledger.
    pub fn decode(body: &[u8]) -> Result<Self> {
        let records: Option<Vec<UrlRecord>> = serde_json::from_slice(body).map_err(|e| {
            ShortledgerError::serialization(format!("Failed to decode ledger: {}", e))
        })?;
        Ok(Self {
            records: records.unwrap_or_default(),
        })
    }

    pub fn encode(&self) -> Result<Bytes> {
        let json = serde_json::to_vec(&self.records)?;
        Ok(Bytes::from(json))
    }

    pub fn find_by_url(&self, original_url: &str) -> Option<&UrlRecord> {
        self.records.iter().find(|r| r.original_url == original_url)
    }

    /// First record in ledger order with this code
    pub fn find_by_code(&self, short_code: &str) -> Option<&UrlRecord> {
        self.records.iter().find(|r| r.short_code == short_code)
    }

    pub fn push(&mut self, record: UrlRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UrlRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[UrlRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a UrlRecord;
    type IntoIter = std::slice::Iter<'a, UrlRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

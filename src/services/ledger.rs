//! URL ledger
//!
//! Owns the read-decode-mutate-encode-write cycle over the single ledger
//! object. Every mutation rewrites the whole record collection.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{LedgerConfig, LedgerWriteMode};
use crate::errors::{Result, ShortledgerError};
use crate::storage::{Ledger, Precondition, PutOutcome, RecordStore, UrlRecord};
use crate::utils::{extract_domain, generate_short_code};

pub const EMPTY_URL_MESSAGE: &str = "URL cannot be empty. Please provide a valid URL";
pub const INVALID_URL_MESSAGE: &str = "invalid URL. Please specify a valid URL";

/// Result of a shorten call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub record: UrlRecord,
    /// false when the URL was already in the ledger
    pub created: bool,
}

pub struct UrlLedger {
    store: Arc<dyn RecordStore>,
    key: String,
    write_mode: LedgerWriteMode,
    max_conflict_retries: u32,
    reject_code_collisions: bool,
}

impl UrlLedger {
    pub fn new(store: Arc<dyn RecordStore>, key: impl Into<String>) -> Self {
        let defaults = LedgerConfig::default();
        Self {
            store,
            key: key.into(),
            write_mode: defaults.write_mode,
            max_conflict_retries: defaults.max_conflict_retries,
            reject_code_collisions: defaults.reject_code_collisions,
        }
    }

    pub fn from_config(
        store: Arc<dyn RecordStore>,
        key: impl Into<String>,
        config: &LedgerConfig,
    ) -> Self {
        Self::new(store, key)
            .with_write_mode(config.write_mode)
            .with_max_conflict_retries(config.max_conflict_retries)
            .with_code_collision_check(config.reject_code_collisions)
    }

    pub fn with_write_mode(mut self, mode: LedgerWriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    pub fn with_code_collision_check(mut self, enabled: bool) -> Self {
        self.reject_code_collisions = enabled;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Read the ledger; `None` when the key does not exist
    pub async fn load(&self) -> Result<Option<Ledger>> {
        Ok(self.load_versioned().await?.map(|(ledger, _)| ledger))
    }

    /// Current ledger, empty when it has never been written
    pub async fn snapshot(&self) -> Result<Ledger> {
        Ok(self.load().await?.unwrap_or_default())
    }

    async fn load_versioned(&self) -> Result<Option<(Ledger, Option<String>)>> {
        if !self.store.exists(&self.key).await? {
            debug!("Ledger {} does not exist yet", self.key);
            return Ok(None);
        }

        let object = match self.store.get(&self.key).await {
            Ok(object) => object,
            // 在 exists 与 get 之间被删除
            Err(ShortledgerError::NotFound(_)) => return Ok(None),
            Err(e) => {
                error!("Failed to read ledger {}: {}", self.key, e);
                return Err(e);
            }
        };

        let ledger = Ledger::decode(&object.body).inspect_err(|e| {
            error!("Ledger {} is corrupt: {}", self.key, e);
        })?;
        debug!("Loaded ledger {} with {} records", self.key, ledger.len());
        Ok(Some((ledger, object.version)))
    }

    fn uses_conditional_writes(&self) -> bool {
        self.write_mode == LedgerWriteMode::Optimistic && self.store.supports_conditional_put()
    }

    /// Shorten a URL, returning the existing record when the exact string
    /// was shortened before
    pub async fn shorten(&self, original_url: &str) -> Result<ShortenOutcome> {
        if original_url.is_empty() {
            return Err(ShortledgerError::invalid_input(EMPTY_URL_MESSAGE));
        }

        let domain = extract_domain(original_url).map_err(|e| {
            debug!("Rejected URL '{}': {}", original_url, e);
            ShortledgerError::invalid_input(INVALID_URL_MESSAGE)
        })?;
        let record = UrlRecord {
            original_url: original_url.to_string(),
            short_code: generate_short_code(original_url),
            domain,
        };

        let conditional = self.uses_conditional_writes();
        let mut conflicts = 0u32;

        loop {
            let (mut ledger, precondition) = match self.load_versioned().await? {
                None => (Ledger::new(), Some(Precondition::Absent)),
                Some((ledger, Some(version))) => (ledger, Some(Precondition::Version(version))),
                Some((ledger, None)) => (ledger, None),
            };

            if let Some(existing) = ledger.find_by_url(original_url) {
                debug!(
                    "URL '{}' already shortened as '{}'",
                    original_url, existing.short_code
                );
                return Ok(ShortenOutcome {
                    record: existing.clone(),
                    created: false,
                });
            }

            if self.reject_code_collisions
                && let Some(owner) = ledger.find_by_code(&record.short_code)
            {
                warn!(
                    "Short code '{}' already belongs to '{}'",
                    record.short_code, owner.original_url
                );
                return Err(ShortledgerError::conflict(format!(
                    "short code '{}' is already used by another URL",
                    record.short_code
                )));
            }

            ledger.push(record.clone());
            let body = ledger.encode()?;

            match precondition.filter(|_| conditional) {
                Some(precondition) => {
                    match self.store.put_if(&self.key, body, precondition).await? {
                        PutOutcome::Written => {}
                        PutOutcome::Conflict => {
                            conflicts += 1;
                            if conflicts > self.max_conflict_retries {
                                warn!(
                                    "Giving up on '{}' after {} conflicting writes",
                                    original_url, conflicts
                                );
                                return Err(ShortledgerError::conflict(
                                    "the ledger was modified concurrently, please retry",
                                ));
                            }
                            warn!(
                                "Ledger changed while shortening '{}', retrying ({}/{})",
                                original_url, conflicts, self.max_conflict_retries
                            );
                            continue;
                        }
                    }
                }
                None => self.store.put(&self.key, body).await?,
            }

            info!(
                "Shortened '{}' -> '{}' (ledger size {})",
                record.original_url,
                record.short_code,
                ledger.len()
            );
            return Ok(ShortenOutcome {
                record,
                created: true,
            });
        }
    }
}

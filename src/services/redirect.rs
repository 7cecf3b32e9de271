use std::sync::Arc;

use tracing::{debug, trace};

use super::UrlLedger;
use crate::errors::{Result, ShortledgerError};

pub const EMPTY_CODE_MESSAGE: &str = "short URL cannot be empty. Please specify a valid shortUrl";
pub const UNKNOWN_CODE_MESSAGE: &str = "short URL does not exist. Please specify a valid shortUrl";

/// Looks short codes up in the ledger. Read-only.
pub struct RedirectResolver {
    ledger: Arc<UrlLedger>,
}

impl RedirectResolver {
    pub fn new(ledger: Arc<UrlLedger>) -> Self {
        Self { ledger }
    }

    /// Original URL of the first record carrying `short_code`
    pub async fn resolve(&self, short_code: &str) -> Result<String> {
        if short_code.is_empty() {
            return Err(ShortledgerError::invalid_input(EMPTY_CODE_MESSAGE));
        }

        let Some(ledger) = self.ledger.load().await? else {
            debug!("Redirect for '{}' but no ledger exists", short_code);
            return Err(ShortledgerError::not_found(UNKNOWN_CODE_MESSAGE));
        };

        match ledger.find_by_code(short_code) {
            Some(record) => {
                trace!("Resolved '{}' -> '{}'", short_code, record.original_url);
                Ok(record.original_url.clone())
            }
            None => {
                debug!("Short code not found: {}", short_code);
                Err(ShortledgerError::not_found(UNKNOWN_CODE_MESSAGE))
            }
        }
    }
}

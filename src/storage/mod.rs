//! Record store adapter
//!
//! A bucket-addressed blob store: the bucket is bound when the store is
//! built, every call names a key. The ledger lives in exactly one key.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::errors::{Result, ShortledgerError};

pub mod backends;
pub mod models;

pub use backends::{FileStore, MemoryStore};
pub use models::{DomainCount, Ledger, UrlRecord};

/// A blob read from the store, with the version token it was read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    /// ETag-like token; `None` when the backend does not version objects
    pub version: Option<String>,
}

/// Precondition for a conditional write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// Only create; fail if the key already exists
    Absent,
    /// Only overwrite the object at this version
    Version(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Written,
    /// The precondition did not hold; nothing was written
    Conflict,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Fails with `NotFound` when the key is absent
    async fn get(&self, key: &str) -> Result<StoredObject>;

    async fn put(&self, key: &str, body: Bytes) -> Result<()>;

    /// Conditional write. Backends without compare-and-swap fall back to a
    /// plain overwrite and always report `Written`.
    async fn put_if(
        &self,
        key: &str,
        body: Bytes,
        _precondition: Precondition,
    ) -> Result<PutOutcome> {
        self.put(key, body).await?;
        Ok(PutOutcome::Written)
    }

    fn supports_conditional_put(&self) -> bool {
        false
    }

    fn bucket(&self) -> &str;

    fn backend_name(&self) -> &'static str;
}

pub struct StoreFactory;

impl StoreFactory {
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn RecordStore>> {
        let store: Arc<dyn RecordStore> = match config.backend.as_str() {
            "memory" => Arc::new(MemoryStore::new(&config.bucket)),
            "file" => Arc::new(FileStore::open(&config.data_dir, &config.bucket).await?),
            #[cfg(feature = "s3")]
            "s3" => Arc::new(
                backends::S3Store::connect(
                    &config.bucket,
                    &config.region,
                    config.endpoint.as_deref(),
                )
                .await?,
            ),
            #[cfg(not(feature = "s3"))]
            "s3" => {
                return Err(ShortledgerError::config(
                    "storage backend 's3' requires building with the `s3` feature",
                ));
            }
            other => {
                return Err(ShortledgerError::config(format!(
                    "Unknown storage backend: {}",
                    other
                )));
            }
        };

        info!(
            "Using storage backend: {} (bucket: {})",
            store.backend_name(),
            store.bucket()
        );
        if !store.supports_conditional_put() {
            warn!(
                "Storage backend '{}' has no conditional writes; concurrent shorten requests may overwrite each other",
                store.backend_name()
            );
        }

        Ok(store)
    }
}

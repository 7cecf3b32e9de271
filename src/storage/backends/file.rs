use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use xxhash_rust::xxh64::xxh64;

use super::validate_key;
use crate::errors::{Result, ShortledgerError};
use crate::storage::{Precondition, PutOutcome, RecordStore, StoredObject};

/// Directory-backed store: the bucket is a directory under `data_dir`,
/// each key is a file inside it.
///
/// Conditional writes are serialized by an in-process lock, so they only
/// hold against writers sharing this `FileStore`.
pub struct FileStore {
    bucket: String,
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub async fn open(data_dir: impl AsRef<Path>, bucket: &str) -> Result<Self> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == ".." {
            return Err(ShortledgerError::config(format!(
                "invalid bucket name: {}",
                bucket
            )));
        }

        let root = data_dir.as_ref().join(bucket);
        fs::create_dir_all(&root).await.map_err(|e| {
            error!("Failed to create bucket directory {}: {}", root.display(), e);
            ShortledgerError::store_failure(format!(
                "Failed to create bucket directory {}: {}",
                root.display(),
                e
            ))
        })?;
        info!("FileStore bucket ready at {}", root.display());

        Ok(Self {
            bucket: bucket.to_string(),
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn fingerprint(body: &[u8]) -> String {
        format!("{:016x}", xxh64(body, 0))
    }

    async fn read_optional(&self, path: &Path) -> Result<Option<Bytes>> {
        match fs::read(path).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(ShortledgerError::store_failure(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }

    /// 先写临时文件再 rename，避免读到半截内容
    async fn write_atomic(&self, path: &Path, body: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("object");
        let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        if let Err(e) = fs::write(&tmp, body).await {
            error!("Failed to write {}: {}", tmp.display(), e);
            return Err(ShortledgerError::store_failure(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            )));
        }
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            error!("Failed to move {} into place: {}", path.display(), e);
            return Err(ShortledgerError::store_failure(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            )));
        }
        debug!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.object_path(key)?;
        fs::try_exists(&path).await.map_err(|e| {
            ShortledgerError::store_failure(format!("Failed to stat {}: {}", path.display(), e))
        })
    }

    async fn get(&self, key: &str) -> Result<StoredObject> {
        let path = self.object_path(key)?;
        match self.read_optional(&path).await? {
            Some(body) => {
                let version = Some(Self::fingerprint(&body));
                Ok(StoredObject { body, version })
            }
            None => Err(ShortledgerError::not_found(format!(
                "object not found: {}/{}",
                self.bucket, key
            ))),
        }
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<()> {
        let path = self.object_path(key)?;
        let _guard = self.write_lock.lock().await;
        self.write_atomic(&path, &body).await
    }

    async fn put_if(
        &self,
        key: &str,
        body: Bytes,
        precondition: Precondition,
    ) -> Result<PutOutcome> {
        let path = self.object_path(key)?;
        let _guard = self.write_lock.lock().await;

        let current = self
            .read_optional(&path)
            .await?
            .map(|existing| Self::fingerprint(&existing));
        let holds = match (&precondition, current) {
            (Precondition::Absent, None) => true,
            (Precondition::Version(expected), Some(actual)) => *expected == actual,
            _ => false,
        };
        if !holds {
            debug!("Conditional write on {} rejected", path.display());
            return Ok(PutOutcome::Conflict);
        }

        self.write_atomic(&path, &body).await?;
        Ok(PutOutcome::Written)
    }

    fn supports_conditional_put(&self) -> bool {
        true
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

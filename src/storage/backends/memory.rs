use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::validate_key;
use crate::errors::{Result, ShortledgerError};
use crate::storage::{Precondition, PutOutcome, RecordStore, StoredObject};

struct Entry {
    body: Bytes,
    version: u64,
}

#[derive(Default)]
struct Inner {
    objects: HashMap<String, Entry>,
    next_version: u64,
}

/// Process-local store. Every write bumps a monotonic version.
pub struct MemoryStore {
    bucket: String,
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            inner: RwLock::new(Inner::default()),
        }
    }

    fn write_locked(inner: &mut Inner, key: &str, body: Bytes) {
        inner.next_version += 1;
        let version = inner.next_version;
        inner.objects.insert(key.to_string(), Entry { body, version });
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.inner.read().objects.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<StoredObject> {
        validate_key(key)?;
        let inner = self.inner.read();
        match inner.objects.get(key) {
            Some(entry) => Ok(StoredObject {
                body: entry.body.clone(),
                version: Some(entry.version.to_string()),
            }),
            None => Err(ShortledgerError::not_found(format!(
                "object not found: {}/{}",
                self.bucket, key
            ))),
        }
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<()> {
        validate_key(key)?;
        Self::write_locked(&mut self.inner.write(), key, body);
        Ok(())
    }

    async fn put_if(
        &self,
        key: &str,
        body: Bytes,
        precondition: Precondition,
    ) -> Result<PutOutcome> {
        validate_key(key)?;
        let mut inner = self.inner.write();
        let current = inner.objects.get(key).map(|e| e.version.to_string());
        let holds = match (&precondition, current) {
            (Precondition::Absent, None) => true,
            (Precondition::Version(expected), Some(actual)) => *expected == actual,
            _ => false,
        };
        if !holds {
            return Ok(PutOutcome::Conflict);
        }
        Self::write_locked(&mut inner, key, body);
        Ok(PutOutcome::Written)
    }

    fn supports_conditional_put(&self) -> bool {
        true
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryStore::new("bucket");
        assert!(!store.exists("urls.json").await.unwrap());
        assert!(matches!(
            store.get("urls.json").await,
            Err(ShortledgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryStore::new("bucket");
        store.put("urls.json", Bytes::from_static(b"[]")).await.unwrap();
        assert!(store.exists("urls.json").await.unwrap());
        let object = store.get("urls.json").await.unwrap();
        assert_eq!(object.body, Bytes::from_static(b"[]"));
        assert!(object.version.is_some());
    }

    #[tokio::test]
    async fn test_conditional_put() {
        let store = MemoryStore::new("bucket");
        let created = store
            .put_if("k", Bytes::from_static(b"1"), Precondition::Absent)
            .await
            .unwrap();
        assert_eq!(created, PutOutcome::Written);

        // 已存在时 Absent 条件不成立
        let again = store
            .put_if("k", Bytes::from_static(b"2"), Precondition::Absent)
            .await
            .unwrap();
        assert_eq!(again, PutOutcome::Conflict);

        let v1 = store.get("k").await.unwrap().version.unwrap();
        store.put("k", Bytes::from_static(b"3")).await.unwrap();

        let stale = store
            .put_if("k", Bytes::from_static(b"4"), Precondition::Version(v1))
            .await
            .unwrap();
        assert_eq!(stale, PutOutcome::Conflict);
        assert_eq!(store.get("k").await.unwrap().body, Bytes::from_static(b"3"));

        let v2 = store.get("k").await.unwrap().version.unwrap();
        let fresh = store
            .put_if("k", Bytes::from_static(b"5"), Precondition::Version(v2))
            .await
            .unwrap();
        assert_eq!(fresh, PutOutcome::Written);
    }
}

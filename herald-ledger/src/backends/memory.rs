use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use async_trait::async_trait;

use crate::{error::LedgerError, key::LedgerKey, r#trait::BlobStore};

/// In-memory blob store
///
/// Stores blobs in a `HashMap` behind an `RwLock`. Primarily intended for
/// tests; also usable for transient runs where history should not survive
/// the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<RwLock<AHashMap<LedgerKey, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Check whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot the blob for `key`, if any
    #[must_use]
    pub fn get(&self, key: &LedgerKey) -> Option<Vec<u8>> {
        self.blobs
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn read(&self, key: &LedgerKey) -> crate::Result<Option<Vec<u8>>> {
        Ok(self
            .blobs
            .read()
            .map_err(|e| LedgerError::Internal(format!("Lock poisoned: {e}")))?
            .get(key)
            .cloned())
    }

    async fn write(&self, key: &LedgerKey, bytes: &[u8]) -> crate::Result<()> {
        self.blobs
            .write()
            .map_err(|e| LedgerError::Internal(format!("Lock poisoned: {e}")))?
            .insert(key.clone(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_operations() {
        let store = MemoryStore::new();
        let key = LedgerKey::new("operator", false);

        assert!(store.read(&key).await.expect("read").is_none());
        assert!(store.is_empty());

        store.write(&key, b"payload").await.expect("write");
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.read(&key).await.expect("read").expect("present"),
            b"payload"
        );
    }

    #[tokio::test]
    async fn keys_are_namespaced_by_dry_run_mode() {
        let store = MemoryStore::new();

        store
            .write(&LedgerKey::new("operator", true), b"dry")
            .await
            .expect("write");

        assert!(
            store
                .read(&LedgerKey::new("operator", false))
                .await
                .expect("read")
                .is_none()
        );
    }
}

//! Persistence trait for ledger blobs

use async_trait::async_trait;

use crate::key::LedgerKey;

/// Backing storage for serialized ledger documents
///
/// Implementations store opaque byte blobs addressed by a [`LedgerKey`].
/// A missing blob is not an error: `read` returns `Ok(None)` so callers can
/// distinguish "no prior history" from a real read failure.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Read the blob for `key`, or `None` if no blob has been written yet
    ///
    /// # Errors
    /// If the blob exists but cannot be read
    async fn read(&self, key: &LedgerKey) -> crate::Result<Option<Vec<u8>>>;

    /// Durably write the blob for `key`, replacing any previous contents
    ///
    /// # Errors
    /// If the blob cannot be written
    async fn write(&self, key: &LedgerKey, bytes: &[u8]) -> crate::Result<()>;
}

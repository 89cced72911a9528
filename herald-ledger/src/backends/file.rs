use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

use crate::{key::LedgerKey, r#trait::BlobStore};

/// File-backed blob store
///
/// Stores one document per ledger key under a data directory. Writes go to a
/// temporary file first and are renamed into place, so a crash mid-write
/// leaves the previous document intact rather than a truncated one.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store writes into
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &LedgerKey) -> PathBuf {
        self.root.join(key.blob_name())
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn read(&self, key: &LedgerKey) -> crate::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &LedgerKey, bytes: &[u8]) -> crate::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(())
    }
}

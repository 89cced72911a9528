//! Recipient manifest
//!
//! A file-backed [`Directory`] implementation: the recipient list is read
//! from a JSON manifest produced by whatever directory service the operator
//! exports from. The manifest is expected to be ordered
//! most-recently-followed first, as the engine's `recent` sort relies on it.

use std::path::PathBuf;

use async_trait::async_trait;
use herald_dispatch::{Directory, DirectoryError, Recipient};

/// Directory backed by a JSON manifest on disk
///
/// The document is a JSON array of recipients:
/// `[{ "id": "...", "display_name": "...", "follower_count": 0, "bio_tags": [] }]`
#[derive(Debug, Clone)]
pub struct ManifestDirectory {
    path: PathBuf,
}

impl ManifestDirectory {
    /// Create a directory reading from `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Directory for ManifestDirectory {
    async fn fetch_recipients(&self, _owner: &str) -> Result<Vec<Recipient>, DirectoryError> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DirectoryError::Unavailable(format!(
                "cannot read recipient manifest {}: {e}",
                self.path.display()
            ))
        })?;

        let recipients: Vec<Recipient> = serde_json::from_str(&text)
            .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            manifest = %self.path.display(),
            recipients = recipients.len(),
            "Loaded recipient manifest"
        );

        Ok(recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_recipients_from_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recipients.json");
        std::fs::write(
            &path,
            r#"[
                { "id": "r1", "display_name": "Ada", "follower_count": 10, "bio_tags": ["tech"] },
                { "id": "r2", "display_name": "Grace", "follower_count": 5 }
            ]"#,
        )
        .expect("write manifest");

        let directory = ManifestDirectory::new(&path);
        let recipients = directory
            .fetch_recipients("operator")
            .await
            .expect("fetch succeeds");

        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients[0].id.as_str(), "r1");
        assert!(recipients[1].bio_tags.is_empty());
    }

    #[tokio::test]
    async fn missing_manifest_is_a_directory_error() {
        let directory = ManifestDirectory::new("/nonexistent/recipients.json");
        let err = directory
            .fetch_recipients("operator")
            .await
            .expect_err("must fail");

        assert!(matches!(err, DirectoryError::Unavailable(_)));
    }

    #[tokio::test]
    async fn malformed_manifest_is_an_invalid_response() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recipients.json");
        std::fs::write(&path, "not json").expect("write manifest");

        let directory = ManifestDirectory::new(&path);
        let err = directory
            .fetch_recipients("operator")
            .await
            .expect_err("must fail");

        assert!(matches!(err, DirectoryError::InvalidResponse(_)));
    }
}

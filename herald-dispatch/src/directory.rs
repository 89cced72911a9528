//! External directory service interface
//!
//! The recipient list comes from an upstream directory service, called once
//! at run start. Recipients are read-only to this crate.

use async_trait::async_trait;
use herald_ledger::RecipientId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One potential recipient, as supplied by the directory service
///
/// The directory returns recipients ordered most-recently-followed first;
/// the selector relies on that ordering for [`SortOrder::Recent`] and for
/// tie-breaking under [`SortOrder::Influence`].
///
/// [`SortOrder::Recent`]: crate::campaign::SortOrder::Recent
/// [`SortOrder::Influence`]: crate::campaign::SortOrder::Influence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Stable identifier, used for ledger bookkeeping
    pub id: RecipientId,
    /// Human-readable name, used only for progress logging
    pub display_name: String,
    /// Influence measure used by [`SortOrder::Influence`]
    ///
    /// [`SortOrder::Influence`]: crate::campaign::SortOrder::Influence
    pub follower_count: u64,
    /// Tags extracted from the recipient's bio, matched case-insensitively
    /// against the campaign filter
    #[serde(default)]
    pub bio_tags: Vec<String>,
}

/// Directory-service failure
///
/// Fatal to the run: recipients cannot be selected without the list, and the
/// fetch is not retried internally.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The directory could not be reached or refused the request
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// The directory responded with data that could not be understood
    #[error("Invalid directory response: {0}")]
    InvalidResponse(String),
}

/// Source of the recipient list
#[async_trait]
pub trait Directory: Send + Sync + std::fmt::Debug {
    /// Fetch all recipients for `owner`, most-recently-followed first
    ///
    /// # Errors
    /// On transport failure; callers treat this as fatal to the run
    async fn fetch_recipients(&self, owner: &str) -> Result<Vec<Recipient>, DirectoryError>;
}

/// Directory backed by a fixed list, for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    recipients: Vec<Recipient>,
}

impl StaticDirectory {
    /// Create a directory that always returns `recipients`
    #[must_use]
    pub const fn new(recipients: Vec<Recipient>) -> Self {
        Self { recipients }
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn fetch_recipients(&self, _owner: &str) -> Result<Vec<Recipient>, DirectoryError> {
        Ok(self.recipients.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_deserializes_with_missing_tags() {
        let recipient: Recipient = serde_json::from_str(
            r#"{ "id": "r1", "display_name": "Ada", "follower_count": 10 }"#,
        )
        .expect("valid");

        assert_eq!(recipient.id.as_str(), "r1");
        assert!(recipient.bio_tags.is_empty());
    }
}

//! Campaign model and validation
//!
//! A campaign is one operator-defined bulk-send task: the message, how the
//! recipient list is ordered and filtered, an optional cap on total sends,
//! and the dry-run flag. Validation is all-or-nothing; a document that fails
//! any rule never reaches the engine.

use herald_ledger::CampaignId;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Recipient ordering for a campaign
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Descending follower count, ties preserve input order
    #[default]
    Influence,
    /// Preserve input order (the directory service returns
    /// most-recently-followed first)
    Recent,
}

/// Errors produced while validating a campaign document
#[derive(Debug, Error)]
pub enum CampaignError {
    /// The document is not valid JSON or a field has the wrong shape
    #[error("Invalid campaign document: {0}")]
    Parse(#[from] serde_json::Error),

    /// No message content specified
    #[error("No message specified, can't continue")]
    MissingMessage,
}

/// A validated campaign, immutable after construction
#[derive(Debug, Clone)]
pub struct Campaign {
    /// Literal message content to send
    pub message: String,
    /// Unique campaign identifier
    pub campaign_id: CampaignId,
    /// Recipient ordering
    pub sort: SortOrder,
    /// Optional cap on total sends; `None` means "send to everyone selected"
    pub count: Option<u64>,
    /// Lowercased filter tags; empty means no filtering
    pub tags: Vec<String>,
    /// When true, no message is transmitted but all bookkeeping behaves
    /// identically, against a separate ledger namespace
    pub dry_run: bool,
}

/// A JSON scalar that may be a string or a number
///
/// Campaign ids and filter tags written as bare numbers are accepted and
/// stringified; any other shape is rejected.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::String(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilterDocument {
    #[serde(default)]
    tags: Option<Vec<StringOrNumber>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CampaignDocument {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    campaign_id: Option<StringOrNumber>,
    #[serde(default)]
    sort: Option<SortOrder>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    filter: Option<FilterDocument>,
    #[serde(default)]
    dry_run: bool,
}

impl Campaign {
    /// Parse and validate a campaign from its JSON document
    ///
    /// # Errors
    /// On malformed JSON, wrongly typed fields, or a missing/empty message
    pub fn from_json(text: &str) -> Result<Self, CampaignError> {
        let doc: CampaignDocument = serde_json::from_str(text)?;
        Self::from_document(doc)
    }

    fn from_document(doc: CampaignDocument) -> Result<Self, CampaignError> {
        let message = doc
            .message
            .filter(|m| !m.is_empty())
            .ok_or(CampaignError::MissingMessage)?;

        // No explicit id: derive it from the message content so identical
        // messages deduplicate to the same campaign across runs
        let campaign_id = doc.campaign_id.map_or_else(
            || CampaignId::new(derive_campaign_id(&message)),
            |id| CampaignId::new(id.into_string()),
        );

        // Tags match case-insensitively; normalise once here
        let tags = doc
            .filter
            .and_then(|f| f.tags)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.into_string().to_lowercase())
            .collect();

        Ok(Self {
            message,
            campaign_id,
            sort: doc.sort.unwrap_or_default(),
            count: doc.count,
            tags,
            dry_run: doc.dry_run,
        })
    }
}

fn derive_campaign_id(message: &str) -> String {
    hex::encode(Sha256::digest(message.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_campaign_uses_defaults() {
        let campaign = Campaign::from_json(r#"{ "message": "hello" }"#).expect("valid");

        assert_eq!(campaign.message, "hello");
        assert_eq!(campaign.sort, SortOrder::Influence);
        assert_eq!(campaign.count, None);
        assert!(campaign.tags.is_empty());
        assert!(!campaign.dry_run);
    }

    #[test]
    fn missing_campaign_id_is_derived_from_message_digest() {
        let a = Campaign::from_json(r#"{ "message": "hello" }"#).expect("valid");
        let b = Campaign::from_json(r#"{ "message": "hello" }"#).expect("valid");
        let c = Campaign::from_json(r#"{ "message": "different" }"#).expect("valid");

        assert_eq!(a.campaign_id, b.campaign_id);
        assert_ne!(a.campaign_id, c.campaign_id);
        // SHA-256 hex digest
        assert_eq!(a.campaign_id.as_str().len(), 64);
    }

    #[test]
    fn numeric_campaign_id_is_stringified() {
        let campaign =
            Campaign::from_json(r#"{ "message": "hello", "campaign_id": 42 }"#).expect("valid");
        assert_eq!(campaign.campaign_id.as_str(), "42");
    }

    #[test]
    fn filter_tags_are_lowercased_and_numbers_stringified() {
        let campaign = Campaign::from_json(
            r#"{ "message": "hello", "filter": { "tags": ["TECH", "News", 2024] } }"#,
        )
        .expect("valid");

        assert_eq!(campaign.tags, vec!["tech", "news", "2024"]);
    }

    #[test]
    fn missing_message_is_rejected() {
        let err = Campaign::from_json(r#"{ "campaign_id": "c1" }"#).expect_err("invalid");
        assert!(matches!(err, CampaignError::MissingMessage));
    }

    #[test]
    fn empty_message_is_rejected() {
        let err = Campaign::from_json(r#"{ "message": "" }"#).expect_err("invalid");
        assert!(matches!(err, CampaignError::MissingMessage));
    }

    #[test]
    fn wrongly_typed_message_is_rejected() {
        let err = Campaign::from_json(r#"{ "message": 5 }"#).expect_err("invalid");
        assert!(matches!(err, CampaignError::Parse(_)));
    }

    #[test]
    fn invalid_sort_is_rejected() {
        let err =
            Campaign::from_json(r#"{ "message": "hello", "sort": "alphabetical" }"#)
                .expect_err("invalid");
        assert!(matches!(err, CampaignError::Parse(_)));
    }

    #[test]
    fn recent_sort_is_accepted() {
        let campaign =
            Campaign::from_json(r#"{ "message": "hello", "sort": "recent" }"#).expect("valid");
        assert_eq!(campaign.sort, SortOrder::Recent);
    }

    #[test]
    fn boolean_filter_tag_is_rejected() {
        let err = Campaign::from_json(r#"{ "message": "hello", "filter": { "tags": [true] } }"#)
            .expect_err("invalid");
        assert!(matches!(err, CampaignError::Parse(_)));
    }

    #[test]
    fn dry_run_flag_is_honoured() {
        let campaign =
            Campaign::from_json(r#"{ "message": "hello", "dry_run": true }"#).expect("valid");
        assert!(campaign.dry_run);
    }
}

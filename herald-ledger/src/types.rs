//! Identifier newtypes and the send-event record
//!
//! Campaign and recipient identifiers are wrapped to prevent accidentally
//! passing one where the other is expected. Both are cheap to clone
//! (`Arc<str>` internally) since they are copied into every recorded event.

use std::{
    fmt::{self, Display},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for one operator-defined campaign
///
/// Either supplied explicitly in the campaign document or derived as the
/// SHA-256 digest of the message content, so identical messages without an
/// explicit id deduplicate to the same campaign across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct CampaignId(Arc<str>);

impl CampaignId {
    /// Create a new `CampaignId` from any type that can be converted to `Arc<str>`
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CampaignId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Identifier for one recipient, as supplied by the upstream directory service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct RecipientId(Arc<str>);

impl RecipientId {
    /// Create a new `RecipientId` from any type that can be converted to `Arc<str>`
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecipientId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// One attempted-and-accepted send
///
/// Recorded only after the transport call succeeds (or is simulated in a dry
/// run). The serialized field names match the on-disk ledger document:
/// `campaign_id`, `recipient`, `time` (ISO-8601).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEvent {
    /// Campaign this send belonged to
    pub campaign_id: CampaignId,
    /// Recipient that was contacted
    pub recipient: RecipientId,
    /// Instant the send was accepted
    pub time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_id_display_round_trip() {
        let id = CampaignId::new("spring-launch");
        assert_eq!(id.as_str(), "spring-launch");
        assert_eq!(id.to_string(), "spring-launch");
    }

    #[test]
    fn send_event_serializes_with_iso8601_time() {
        let event = SendEvent {
            campaign_id: CampaignId::new("c1"),
            recipient: RecipientId::new("r1"),
            time: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .expect("valid timestamp")
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&event).expect("serializes");
        assert_eq!(json["campaign_id"], "c1");
        assert_eq!(json["recipient"], "r1");
        assert_eq!(json["time"], "2024-05-01T12:00:00Z");
    }
}

//! The send-history ledger
//!
//! Two structures, always updated together and persisted together:
//!
//! - `events`: the chronological, append-only log of every accepted send,
//!   across all campaigns for one sender identity. Used only for rate pacing.
//! - `campaigns`: per-campaign map of recipient to send time. The
//!   authoritative record for idempotent resume.
//!
//! The ledger is loaded once at engine start, mutated in memory after every
//! successful send, and flushed to the blob store synchronously after every
//! mutation, so a crash loses at most the in-flight send.

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::LedgerError,
    key::LedgerKey,
    r#trait::BlobStore,
    types::{CampaignId, RecipientId, SendEvent},
};

type RecipientMap = AHashMap<RecipientId, DateTime<Utc>>;

/// Durable record of every send event and which recipients have already been
/// contacted, per campaign
///
/// Single-owner within one engine run; no concurrent mutation is supported.
/// A second concurrent run against the same sender and dry-run mode is unsafe
/// and must be prevented by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    events: Vec<SendEvent>,
    campaigns: AHashMap<CampaignId, RecipientMap>,
}

impl Ledger {
    /// Create an empty ledger
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the ledger for `key` from `store`
    ///
    /// Returns an empty ledger if no blob has been persisted yet. Any other
    /// failure, including a document that violates the event/campaign-map
    /// co-invariant, is an error the caller must treat as fatal.
    ///
    /// # Errors
    /// If the blob cannot be read, parsed, or fails consistency validation
    pub async fn load(store: &dyn BlobStore, key: &LedgerKey) -> crate::Result<Self> {
        let Some(bytes) = store.read(key).await? else {
            tracing::debug!(key = %key, "No prior ledger, starting empty");
            return Ok(Self::empty());
        };

        let ledger: Self = serde_json::from_slice(&bytes)?;
        ledger.validate()?;

        tracing::debug!(
            key = %key,
            events = ledger.events.len(),
            campaigns = ledger.campaigns.len(),
            "Loaded ledger"
        );

        Ok(ledger)
    }

    /// Whether `recipient` has already received the message for `campaign`
    #[must_use]
    pub fn has_received(&self, campaign: &CampaignId, recipient: &RecipientId) -> bool {
        self.campaigns
            .get(campaign)
            .is_some_and(|recipients| recipients.contains_key(recipient))
    }

    /// Record an accepted send and persist the full ledger before returning
    ///
    /// Appends to the event log and updates the per-campaign map in one step,
    /// then flushes the document to `store`. Persistence failure is fatal: the
    /// caller must stop rather than continue with an untrustworthy history.
    ///
    /// # Errors
    /// If the ledger cannot be serialized or written
    pub async fn record_send(
        &mut self,
        store: &dyn BlobStore,
        key: &LedgerKey,
        campaign: CampaignId,
        recipient: RecipientId,
        time: DateTime<Utc>,
    ) -> crate::Result<()> {
        self.events.push(SendEvent {
            campaign_id: campaign.clone(),
            recipient: recipient.clone(),
            time,
        });
        self.campaigns
            .entry(campaign)
            .or_default()
            .insert(recipient, time);

        self.persist(store, key).await
    }

    /// The full chronological event log, oldest first
    #[must_use]
    pub fn events(&self) -> &[SendEvent] {
        &self.events
    }

    /// Total number of accepted sends across all campaigns
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    async fn persist(&self, store: &dyn BlobStore, key: &LedgerKey) -> crate::Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        store.write(key, &bytes).await
    }

    /// Enforce the event/campaign-map co-invariant
    ///
    /// `campaigns[c][r]` exists iff a `SendEvent` with that `(c, r)` pair
    /// exists in `events`.
    fn validate(&self) -> crate::Result<()> {
        let event_pairs: AHashSet<(&CampaignId, &RecipientId)> = self
            .events
            .iter()
            .map(|e| (&e.campaign_id, &e.recipient))
            .collect();

        for event in &self.events {
            if !self.has_received(&event.campaign_id, &event.recipient) {
                return Err(LedgerError::Inconsistent(format!(
                    "event ({}, {}) has no matching campaign-map entry",
                    event.campaign_id, event.recipient
                )));
            }
        }

        for (campaign, recipients) in &self.campaigns {
            for recipient in recipients.keys() {
                if !event_pairs.contains(&(campaign, recipient)) {
                    return Err(LedgerError::Inconsistent(format!(
                        "campaign-map entry ({campaign}, {recipient}) has no matching event"
                    )));
                }
            }
        }

        Ok(())
    }
}

//! Recipient selection
//!
//! Pure transformation applied once per run, in a fixed order:
//! already-contacted exclusion, tag filter, sort, cap. The dispatch loop
//! never reorders the result.

use herald_ledger::Ledger;

use crate::{
    campaign::{Campaign, SortOrder},
    directory::Recipient,
};

/// Result of selecting recipients for one run
#[derive(Debug, Clone)]
pub struct Selection {
    /// Recipients to dispatch to, in final processing order
    pub recipients: Vec<Recipient>,
    /// How many recipients were dropped because they already received this
    /// campaign's message
    pub already_contacted: usize,
    /// Effective send target: `min(campaign.count, selected)`
    pub target: usize,
}

impl Selection {
    /// Whether there is nothing left to do
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.recipients.is_empty() || self.target == 0
    }
}

/// Select, order, and cap the recipients for `campaign`
#[must_use]
pub fn select(campaign: &Campaign, ledger: &Ledger, recipients: Vec<Recipient>) -> Selection {
    let before = recipients.len();

    // 1. Drop anyone this campaign has already reached; resume derives purely
    //    from this exclusion, no recipient index is checkpointed
    let mut selected: Vec<Recipient> = recipients
        .into_iter()
        .filter(|r| !ledger.has_received(&campaign.campaign_id, &r.id))
        .collect();
    let already_contacted = before - selected.len();

    if already_contacted > 0 {
        tracing::info!(
            already_contacted,
            remaining = selected.len(),
            "Excluded recipients already contacted by this campaign"
        );
    }

    // 2. Tag filter: keep a recipient iff any bio tag matches any filter tag,
    //    case-insensitively (campaign tags are pre-lowercased)
    if !campaign.tags.is_empty() {
        tracing::info!(tags = ?campaign.tags, "Applying filter, only sending to matching recipients");

        selected.retain(|r| {
            r.bio_tags
                .iter()
                .any(|tag| campaign.tags.iter().any(|keep| tag.to_lowercase() == *keep))
        });

        tracing::info!(matched = selected.len(), "Recipients contained matching tags");
    }

    // 3. Sort. The directory returns most-recently-followed first, so Recent
    //    needs no re-sort; Influence is a stable sort, ties preserve input order
    match campaign.sort {
        SortOrder::Influence => {
            tracing::info!("Sorting recipients by influence");
            selected.sort_by(|a, b| b.follower_count.cmp(&a.follower_count));
        }
        SortOrder::Recent => {
            tracing::info!("Keeping most-recently-followed order");
        }
    }

    // 4. Cap
    let target = campaign.count.map_or(selected.len(), |count| {
        usize::try_from(count)
            .unwrap_or(usize::MAX)
            .min(selected.len())
    });

    Selection {
        recipients: selected,
        already_contacted,
        target,
    }
}

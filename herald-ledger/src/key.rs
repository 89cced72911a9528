//! Ledger storage key derivation
//!
//! The key identifies one sender identity plus the dry-run mode, so live and
//! dry-run ledgers for the same sender never collide.

use std::fmt::{self, Display};

/// Storage key for one sender's ledger
///
/// Derives the blob name deterministically: `<sender>.messageHistory.json`
/// for live runs, `<sender>.dryrun.messageHistory.json` for dry runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerKey {
    sender: String,
    dry_run: bool,
}

impl LedgerKey {
    /// Create a key for the given sender identity and dry-run mode
    #[must_use]
    pub fn new(sender: impl Into<String>, dry_run: bool) -> Self {
        Self {
            sender: sender.into(),
            dry_run,
        }
    }

    /// The sender identity this key belongs to
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Whether this key addresses the dry-run ledger namespace
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Blob name for this key
    #[must_use]
    pub fn blob_name(&self) -> String {
        if self.dry_run {
            format!("{}.dryrun.messageHistory.json", self.sender)
        } else {
            format!("{}.messageHistory.json", self.sender)
        }
    }
}

impl Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.blob_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_and_dry_run_keys_never_collide() {
        let live = LedgerKey::new("operator", false);
        let dry = LedgerKey::new("operator", true);

        assert_ne!(live, dry);
        assert_ne!(live.blob_name(), dry.blob_name());
        assert_eq!(live.blob_name(), "operator.messageHistory.json");
        assert_eq!(dry.blob_name(), "operator.dryrun.messageHistory.json");
    }
}

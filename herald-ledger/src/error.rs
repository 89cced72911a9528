//! Error types for the herald-ledger crate
//!
//! Any error from this crate is fatal to a dispatch run: a ledger that
//! cannot be read (for a reason other than "does not exist yet") or written
//! means the send-history guarantee can no longer be trusted.

use std::io;

use thiserror::Error;

/// Top-level ledger error type
#[derive(Debug, Error)]
pub enum LedgerError {
    /// I/O operation failed (blob read/write)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization or deserialization of the ledger document failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persisted document violates the event/campaign-map co-invariant
    ///
    /// Every `(campaign, recipient)` pair in the per-campaign map must have a
    /// matching entry in the event log, and vice versa. Documents that fail
    /// this check are rejected rather than trusted.
    #[error("Inconsistent ledger document: {0}")]
    Inconsistent(String),

    /// Other internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Specialized `Result` type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn inconsistent_error_display() {
        let err = LedgerError::Inconsistent("campaign c1 references unknown recipient".into());
        assert!(err.to_string().starts_with("Inconsistent ledger document"));
    }
}

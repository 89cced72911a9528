//! Typed error handling for dispatch runs
//!
//! Everything here is fatal: configuration, ledger, and directory failures
//! abort the run before or during dispatch. Transport errors are not in this
//! taxonomy because the engine handles them locally (retry or skip) per
//! their classification.

use herald_ledger::{LedgerError, RecipientId};
use thiserror::Error;

use crate::{campaign::CampaignError, directory::DirectoryError};

/// Fatal dispatch-run error
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The campaign document failed validation; nothing was dispatched
    #[error("Campaign error: {0}")]
    Campaign(#[from] CampaignError),

    /// The ledger could not be read or written; the history guarantee cannot
    /// be trusted, so the run stops
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The recipient list could not be fetched
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// A bounded retry policy ran out of attempts for one recipient
    #[error("Gave up on recipient {recipient} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Recipient the engine was stuck on
        recipient: RecipientId,
        /// Attempts made before giving up
        attempts: u32,
        /// The last transport error observed
        last_error: String,
    },
}

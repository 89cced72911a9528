//! Durable send-history ledger for the herald campaign dispatcher
//!
//! This crate provides:
//! - The append-only log of send events and the per-campaign record of
//!   which recipients have already been contacted
//! - Blob persistence backends (file and in-memory) behind a common trait
//! - The rolling-window pacing calculator that derives the wait before the
//!   next permitted send purely from the event log

pub mod backends;
pub mod error;
pub mod key;
pub mod ledger;
pub mod pacing;
pub mod r#trait;
pub mod types;

pub use backends::{FileStore, MemoryStore};
pub use error::{LedgerError, Result};
pub use key::LedgerKey;
pub use ledger::Ledger;
pub use pacing::{DEFAULT_SEND_LIMIT, DEFAULT_WINDOW, wait_before_next_send};
pub use r#trait::BlobStore;
pub use types::{CampaignId, RecipientId, SendEvent};

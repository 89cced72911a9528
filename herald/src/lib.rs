//! herald — a rate-paced, resumable bulk-message campaign dispatcher
//!
//! Ties the dispatch engine to its concrete collaborators: a file-backed
//! ledger store, a recipient manifest standing in for the external directory
//! service, and logging setup. The engine itself lives in `herald-dispatch`;
//! the ledger and pacing in `herald-ledger`.

pub mod controller;
pub mod logging;
pub mod manifest;
pub mod transport;

pub use controller::{RunOptions, run};

//! Campaign dispatch engine for herald
//!
//! This crate provides:
//! - The validated campaign model (message, id derivation, sort, filter, cap)
//! - Recipient selection (already-contacted exclusion, tag filter, sort, cap)
//! - The strictly sequential, resumable dispatch engine with rolling-window
//!   pacing and transient/permanent transport-error classification
//! - Collaborator traits for the external directory service and transport
//!   client, plus a clock abstraction so waits are testable without real time

pub mod campaign;
pub mod clock;
pub mod directory;
pub mod engine;
pub mod error;
pub mod policy;
pub mod selector;
pub mod transport;

pub use campaign::{Campaign, CampaignError, SortOrder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use directory::{Directory, DirectoryError, Recipient, StaticDirectory};
pub use engine::{DispatchEngine, EngineState, RunOutcome, RunSummary};
pub use error::DispatchError;
pub use policy::{CooldownPolicy, PacingConfig};
pub use selector::{Selection, select};
pub use transport::{Ack, ScriptedTransport, Transport, TransportError};

//! Blob storage backends
//!
//! - [`FileStore`]: one JSON document per ledger key under a data directory
//! - [`MemoryStore`]: in-memory map, primarily for tests

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

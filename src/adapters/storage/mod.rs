//! Storage Adapters
//!
//! Implementations of the ScratchStorage port.
//!
//! - **LocalScratchStorage** - Transient PDF files in a local directory

mod local_scratch_storage;

pub use local_scratch_storage::LocalScratchStorage;

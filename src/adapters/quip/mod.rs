//! Quip adapter.
//!
//! Implements the `DocumentPlatform` port against the Quip REST API:
//! token verification, users, thread search and listing, and the
//! asynchronous PDF export endpoints.

mod quip_adapter;
mod wire_types;

pub use quip_adapter::{QuipConfig, QuipDocumentAdapter, DEFAULT_QUIP_BASE_URL};
pub use wire_types::{
    ExportCreated, ExportStatusResponse, QuipThread, QuipUser, ThreadEnvelope, UsersResponse,
};

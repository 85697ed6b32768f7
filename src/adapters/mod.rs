//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `quip` - Quip REST API (`DocumentPlatform`)
//! - `slack` - Slack Web API (`ChatPlatform`), request signing, inbound payloads
//! - `storage` - Local scratch files for downloaded PDFs (`ScratchStorage`)
//! - `timer` - Tokio-backed `Sleeper`
//! - `http` - Axum endpoints Slack calls into

pub mod http;
pub mod quip;
pub mod slack;
pub mod storage;
pub mod timer;

pub use quip::{QuipConfig, QuipDocumentAdapter};
pub use slack::{SlackChatAdapter, SlackConfig, SlackSignatureVerifier};
pub use storage::LocalScratchStorage;
pub use timer::TokioSleeper;

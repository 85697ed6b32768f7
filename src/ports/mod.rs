//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `DocumentPlatform` - Quip REST API (threads, users, PDF export)
//! - `ChatPlatform` - Slack Web API (messages, file uploads)
//! - `ScratchStorage` - Transient local files for uploads
//! - `Sleeper` - Delay between export status checks

mod chat_platform;
mod document_platform;
mod scratch_storage;
mod sleeper;

pub use chat_platform::{ChatError, ChatPlatform, FileUpload};
pub use document_platform::{DocumentPlatform, DocumentPlatformError, SEARCH_PAGE_SIZE};
pub use scratch_storage::{ScratchError, ScratchStorage};
pub use sleeper::Sleeper;

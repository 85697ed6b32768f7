//! Scratch storage port - transient local files backing uploads.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::foundation::RequestId;

/// Port for short-lived files holding a fetched PDF until it is uploaded.
///
/// # Contract
///
/// - File names are derived from the export request id, so two concurrent
///   jobs never share a file.
/// - `remove` succeeds when the file is already gone.
#[async_trait]
pub trait ScratchStorage: Send + Sync {
    /// Writes the bytes and returns the file path.
    async fn write(&self, request_id: &RequestId, bytes: &[u8]) -> Result<PathBuf, ScratchError>;

    /// Deletes a scratch file.
    async fn remove(&self, path: &Path) -> Result<(), ScratchError>;

    /// Path the file for `request_id` lives at.
    fn path_for(&self, request_id: &RequestId) -> PathBuf;
}

/// Errors from scratch storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScratchError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl ScratchError {
    pub fn io(message: impl Into<String>) -> Self {
        ScratchError::Io(message.into())
    }

    pub fn permission_denied(path: impl Into<String>) -> Self {
        ScratchError::PermissionDenied(path.into())
    }
}

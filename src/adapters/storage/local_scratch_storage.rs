//! Local filesystem scratch storage - Implementation of ScratchStorage.
//!
//! Holds a fetched PDF on disk between download and upload. Files are named
//! after the export request id, so concurrent jobs never collide.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::foundation::RequestId;
use crate::ports::{ScratchError, ScratchStorage};

/// Scratch directory on the local filesystem.
///
/// # Layout
///
/// ```text
/// {base_path}/
/// ├── export_{request_id}.pdf
/// └── export_{request_id}.pdf
/// ```
#[derive(Debug, Clone)]
pub struct LocalScratchStorage {
    base_path: PathBuf,
}

impl LocalScratchStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Scratch storage under the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("quip-pdf-bot"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    async fn ensure_base_dir(&self) -> Result<(), ScratchError> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            ScratchError::io(format!(
                "Failed to create scratch directory {}: {}",
                self.base_path.display(),
                e
            ))
        })
    }
}

fn map_io_error(path: &Path, action: &str, e: std::io::Error) -> ScratchError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            ScratchError::permission_denied(path.display().to_string())
        }
        _ => ScratchError::io(format!("Failed to {} {}: {}", action, path.display(), e)),
    }
}

/// Removes a partially written file, returning the error that interrupted it.
async fn discard_partial(path: &Path, error: ScratchError) -> ScratchError {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial scratch file");
        }
    }
    error
}

#[async_trait]
impl ScratchStorage for LocalScratchStorage {
    async fn write(&self, request_id: &RequestId, bytes: &[u8]) -> Result<PathBuf, ScratchError> {
        self.ensure_base_dir().await?;
        let path = self.path_for(request_id);

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| map_io_error(&path, "create", e))?;
        if let Err(e) = file.write_all(bytes).await {
            return Err(discard_partial(&path, map_io_error(&path, "write", e)).await);
        }
        if let Err(e) = file.sync_all().await {
            return Err(discard_partial(&path, map_io_error(&path, "sync", e)).await);
        }

        tracing::debug!(path = %path.display(), size = bytes.len(), "Scratch file written");
        Ok(path)
    }

    async fn remove(&self, path: &Path) -> Result<(), ScratchError> {
        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Scratch file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_error(path, "remove", e)),
        }
    }

    fn path_for(&self, request_id: &RequestId) -> PathBuf {
        self.base_path
            .join(format!("export_{}.pdf", request_id.file_stem()))
    }
}

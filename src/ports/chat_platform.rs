//! Chat platform port - posting messages and files into Slack.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::foundation::ChannelId;
use crate::domain::message::ChatMessage;

/// Port for the chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Posts a message into a channel.
    async fn post_message(
        &self,
        channel: &ChannelId,
        message: &ChatMessage,
    ) -> Result<(), ChatError>;

    /// Uploads a local file into a channel.
    ///
    /// The file is read, not moved; the caller keeps ownership of the path.
    async fn upload_file(&self, channel: &ChannelId, upload: &FileUpload)
        -> Result<(), ChatError>;
}

/// A file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Local file holding the bytes.
    pub path: PathBuf,
    /// File name shown in the channel.
    pub filename: String,
    /// Title shown above the file.
    pub title: String,
}

/// Errors from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("network error: {0}")]
    Network(String),

    #[error("Slack API error: {0}")]
    Api(String),

    #[error("could not read upload file: {0}")]
    File(String),
}

impl ChatError {
    pub fn network(message: impl Into<String>) -> Self {
        ChatError::Network(message.into())
    }

    pub fn api(message: impl Into<String>) -> Self {
        ChatError::Api(message.into())
    }
}

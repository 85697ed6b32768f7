//! Slack Web API adapter.
//!
//! Implements `ChatPlatform` with `chat.postMessage` and the external file
//! upload flow:
//!
//! 1. `files.getUploadURLExternal` reserves an upload URL for the file size
//! 2. the raw bytes are POSTed to that URL
//! 3. `files.completeUploadExternal` shares the file into the channel

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::ChannelId;
use crate::domain::message::{Block, ChatMessage};
use crate::ports::{ChatError, ChatPlatform, FileUpload};

/// Default Slack Web API base URL.
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Slack API configuration.
#[derive(Clone)]
pub struct SlackConfig {
    /// Bot user OAuth token (xoxb-...).
    bot_token: SecretString,

    /// Base URL for the Web API (default: https://slack.com/api).
    api_base_url: String,

    /// Per-request timeout.
    request_timeout: Duration,
}

impl SlackConfig {
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            bot_token,
            api_base_url: DEFAULT_SLACK_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Slack chat adapter.
pub struct SlackChatAdapter {
    config: SlackConfig,
    http_client: reqwest::Client,
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "<[Block]>::is_empty")]
    blocks: &'a [Block],
}

#[derive(Debug, Serialize)]
struct CompleteUploadRequest<'a> {
    files: Vec<UploadedFile<'a>>,
    channel_id: &'a str,
}

#[derive(Debug, Serialize)]
struct UploadedFile<'a> {
    id: &'a str,
    title: &'a str,
}

/// Envelope every Web API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadUrlResponse {
    upload_url: String,
    file_id: String,
}

impl SlackChatAdapter {
    pub fn new(config: SlackConfig) -> Result<Self, ChatError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ChatError::network(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base_url, method)
    }

    /// Checks the HTTP status and the `ok` flag, then decodes the body.
    async fn read_api<T: DeserializeOwned>(
        response: reqwest::Response,
        method: &str,
    ) -> Result<T, ChatError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(method, status = status.as_u16(), error = %body, "Slack request failed");
            return Err(ChatError::api(format!("{} returned {}: {}", method, status, body)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::api(format!("Failed to parse {} response: {}", method, e)))?;

        let envelope: ApiResponse = serde_json::from_value(body.clone())
            .map_err(|e| ChatError::api(format!("Failed to parse {} response: {}", method, e)))?;
        if !envelope.ok {
            let error = envelope.error.unwrap_or_else(|| "unknown_error".to_string());
            tracing::error!(method, %error, "Slack API error");
            return Err(ChatError::api(format!("{}: {}", method, error)));
        }

        serde_json::from_value(body)
            .map_err(|e| ChatError::api(format!("Failed to parse {} response: {}", method, e)))
    }
}

#[async_trait]
impl ChatPlatform for SlackChatAdapter {
    async fn post_message(
        &self,
        channel: &ChannelId,
        message: &ChatMessage,
    ) -> Result<(), ChatError> {
        let request = PostMessageRequest {
            channel: channel.as_str(),
            text: &message.text,
            blocks: &message.blocks,
        };

        let response = self
            .http_client
            .post(self.method_url("chat.postMessage"))
            .bearer_auth(self.config.bot_token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::network(e.to_string()))?;

        let _: ApiResponse = Self::read_api(response, "chat.postMessage").await?;
        tracing::debug!(%channel, "Message posted");
        Ok(())
    }

    async fn upload_file(
        &self,
        channel: &ChannelId,
        upload: &FileUpload,
    ) -> Result<(), ChatError> {
        let bytes = tokio::fs::read(&upload.path).await.map_err(|e| {
            ChatError::File(format!("{}: {}", upload.path.display(), e))
        })?;

        // 1. Reserve an upload URL
        let response = self
            .http_client
            .post(self.method_url("files.getUploadURLExternal"))
            .bearer_auth(self.config.bot_token.expose_secret())
            .form(&[
                ("filename", upload.filename.clone()),
                ("length", bytes.len().to_string()),
            ])
            .send()
            .await
            .map_err(|e| ChatError::network(e.to_string()))?;
        let reserved: UploadUrlResponse =
            Self::read_api(response, "files.getUploadURLExternal").await?;

        // 2. Send the bytes
        let response = self
            .http_client
            .post(&reserved.upload_url)
            .header(reqwest::header::CONTENT_TYPE, "application/pdf")
            .body(bytes)
            .send()
            .await
            .map_err(|e| ChatError::network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ChatError::api(format!(
                "file upload returned {}",
                response.status()
            )));
        }

        // 3. Share into the channel
        let request = CompleteUploadRequest {
            files: vec![UploadedFile {
                id: &reserved.file_id,
                title: &upload.title,
            }],
            channel_id: channel.as_str(),
        };
        let response = self
            .http_client
            .post(self.method_url("files.completeUploadExternal"))
            .bearer_auth(self.config.bot_token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::network(e.to_string()))?;
        let _: ApiResponse = Self::read_api(response, "files.completeUploadExternal").await?;

        tracing::info!(%channel, file_id = %reserved.file_id, filename = %upload.filename, "File uploaded");
        Ok(())
    }
}

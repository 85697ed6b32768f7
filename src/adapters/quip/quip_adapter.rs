//! Quip document platform adapter.
//!
//! Implements `DocumentPlatform` over the Quip REST API (`/1/...`) with
//! bearer-token authentication. The token is passed per call and exposed only
//! when the `Authorization` header is built.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::wire_types::{
    decode_recent, decode_threads, ExportCreated, ExportStatusResponse, ThreadEnvelope,
    UsersResponse,
};
use crate::domain::document::DocumentRef;
use crate::domain::export::ExportPoll;
use crate::domain::foundation::{AccessToken, RequestId, ThreadId, UserId};
use crate::ports::{DocumentPlatform, DocumentPlatformError};

/// Default Quip platform API host.
pub const DEFAULT_QUIP_BASE_URL: &str = "https://platform.quip.com";

/// Quip API configuration.
#[derive(Debug, Clone)]
pub struct QuipConfig {
    /// Base URL of the platform API, without the `/1` version prefix.
    api_base_url: String,

    /// Per-request timeout.
    request_timeout: Duration,
}

impl QuipConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl Default for QuipConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUIP_BASE_URL)
    }
}

/// Quip REST adapter.
pub struct QuipDocumentAdapter {
    config: QuipConfig,
    http_client: reqwest::Client,
}

impl QuipDocumentAdapter {
    pub fn new(config: QuipConfig) -> Result<Self, DocumentPlatformError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DocumentPlatformError::network(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/1/{}", self.config.api_base_url, path)
    }

    async fn get(
        &self,
        token: &AccessToken,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, DocumentPlatformError> {
        tracing::debug!(url, "GET Quip");
        self.http_client
            .get(url)
            .bearer_auth(token.expose())
            .query(query)
            .send()
            .await
            .map_err(|e| DocumentPlatformError::network(e.to_string()))
    }

    /// Fails on non-2xx, otherwise decodes the JSON body.
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T, DocumentPlatformError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(operation, status = status.as_u16(), error = %body, "Quip request failed");
            return Err(DocumentPlatformError::api(status.as_u16(), body));
        }

        response.json::<T>().await.map_err(|e| {
            DocumentPlatformError::decode(format!("Failed to parse Quip {} response: {}", operation, e))
        })
    }
}

#[async_trait]
impl DocumentPlatform for QuipDocumentAdapter {
    async fn verify_token(&self, token: &AccessToken) -> Result<bool, DocumentPlatformError> {
        let response = self
            .get(token, &self.endpoint("oauth/verify_token"), &[])
            .await?;
        Ok(response.status().is_success())
    }

    async fn get_users(
        &self,
        token: &AccessToken,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, String>, DocumentPlatformError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let joined = ids.iter().map(UserId::as_str).collect::<Vec<_>>().join(",");
        let response = self
            .get(token, &self.endpoint("users/"), &[("ids", joined)])
            .await?;
        let users: UsersResponse = Self::read_json(response, "users").await?;
        Ok(users.into_names())
    }

    async fn search_threads(
        &self,
        token: &AccessToken,
        query: &str,
        count: usize,
    ) -> Result<Vec<DocumentRef>, DocumentPlatformError> {
        let response = self
            .get(
                token,
                &self.endpoint("threads/search"),
                &[
                    ("only_match_titles", "true".to_string()),
                    ("count", count.to_string()),
                    ("query", query.to_string()),
                ],
            )
            .await?;
        let envelopes: Vec<ThreadEnvelope> = Self::read_json(response, "search").await?;
        decode_threads(envelopes)
    }

    async fn recent_threads(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<DocumentRef>, DocumentPlatformError> {
        let response = self.get(token, &self.endpoint("threads/recent"), &[]).await?;
        let body: serde_json::Value = Self::read_json(response, "recent threads").await?;
        decode_recent(body)
    }

    async fn get_thread(
        &self,
        token: &AccessToken,
        thread_id: &ThreadId,
    ) -> Result<Option<DocumentRef>, DocumentPlatformError> {
        let response = self
            .get(token, &self.endpoint(&format!("threads/{}", thread_id)), &[])
            .await?;

        if !response.status().is_success() {
            tracing::debug!(%thread_id, status = response.status().as_u16(), "Thread not found");
            return Ok(None);
        }

        let envelope: ThreadEnvelope = Self::read_json(response, "thread").await?;
        DocumentRef::try_from(envelope).map(Some)
    }

    async fn create_pdf_export(
        &self,
        token: &AccessToken,
        thread_id: &ThreadId,
    ) -> Result<Option<RequestId>, DocumentPlatformError> {
        let url = self.endpoint(&format!("threads/{}/export/pdf/async", thread_id));
        tracing::debug!(url = %url, "POST Quip");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| DocumentPlatformError::network(e.to_string()))?;

        let created: ExportCreated = Self::read_json(response, "export creation").await?;
        Ok(created.into_request_id())
    }

    async fn poll_pdf_export(
        &self,
        token: &AccessToken,
        thread_id: &ThreadId,
        request_id: &RequestId,
    ) -> Result<ExportPoll, DocumentPlatformError> {
        let response = self
            .get(
                token,
                &self.endpoint(&format!("threads/{}/export/pdf/async", thread_id)),
                &[("request_id", request_id.to_string())],
            )
            .await?;
        let status: ExportStatusResponse = Self::read_json(response, "export status").await?;
        Ok(status.into())
    }

    async fn fetch_pdf(
        &self,
        token: &AccessToken,
        url: &Url,
    ) -> Result<Vec<u8>, DocumentPlatformError> {
        tracing::debug!(url = %url, "Fetching PDF");
        let response = self
            .http_client
            .get(url.clone())
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| DocumentPlatformError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocumentPlatformError::api(status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DocumentPlatformError::network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

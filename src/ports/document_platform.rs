//! Document platform port - the Quip REST surface the bot consumes.
//!
//! Every call takes the access token explicitly; the port holds no
//! credential state of its own.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

use crate::domain::document::DocumentRef;
use crate::domain::export::ExportPoll;
use crate::domain::foundation::{AccessToken, RequestId, ThreadId, UserId};

/// Maximum number of documents a title search returns.
pub const SEARCH_PAGE_SIZE: usize = 10;

/// Port for the document collaboration platform.
#[async_trait]
pub trait DocumentPlatform: Send + Sync {
    /// Checks whether the token is accepted by the platform.
    async fn verify_token(&self, token: &AccessToken) -> Result<bool, DocumentPlatformError>;

    /// Looks up display names for a batch of users in one request.
    ///
    /// Ids the platform does not know are absent from the result.
    async fn get_users(
        &self,
        token: &AccessToken,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, String>, DocumentPlatformError>;

    /// Title search, ranked by the platform, at most `count` results.
    async fn search_threads(
        &self,
        token: &AccessToken,
        query: &str,
        count: usize,
    ) -> Result<Vec<DocumentRef>, DocumentPlatformError>;

    /// Recently viewed threads of the token's user, in platform order.
    async fn recent_threads(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<DocumentRef>, DocumentPlatformError>;

    /// Fetches one thread. Any non-2xx response means "not found".
    async fn get_thread(
        &self,
        token: &AccessToken,
        thread_id: &ThreadId,
    ) -> Result<Option<DocumentRef>, DocumentPlatformError>;

    /// Starts an asynchronous PDF export.
    ///
    /// Returns `None` when the response carries no request id.
    async fn create_pdf_export(
        &self,
        token: &AccessToken,
        thread_id: &ThreadId,
    ) -> Result<Option<RequestId>, DocumentPlatformError>;

    /// Reads the current status of an export.
    async fn poll_pdf_export(
        &self,
        token: &AccessToken,
        thread_id: &ThreadId,
        request_id: &RequestId,
    ) -> Result<ExportPoll, DocumentPlatformError>;

    /// Downloads the bytes behind a (corrected) PDF URL.
    async fn fetch_pdf(&self, token: &AccessToken, url: &Url)
        -> Result<Vec<u8>, DocumentPlatformError>;
}

/// Errors from the document platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentPlatformError {
    #[error("network error: {0}")]
    Network(String),

    #[error("Quip API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response from Quip: {0}")]
    Decode(String),
}

impl DocumentPlatformError {
    pub fn network(message: impl Into<String>) -> Self {
        DocumentPlatformError::Network(message.into())
    }

    pub fn api(status: u16, body: impl Into<String>) -> Self {
        DocumentPlatformError::Api {
            status,
            body: body.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        DocumentPlatformError::Decode(message.into())
    }
}

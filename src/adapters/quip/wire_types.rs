//! Quip REST payloads and their conversion into domain types.
//!
//! This is the single decoding boundary for Quip data: everything past it
//! works with `DocumentRef` and `ExportPoll`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::document::{DocumentKind, DocumentRef};
use crate::domain::export::{ExportPoll, ExportStatus};
use crate::domain::foundation::{RequestId, ThreadId, UserId};
use crate::ports::DocumentPlatformError;

// ════════════════════════════════════════════════════════════════════════════════
// Threads
// ════════════════════════════════════════════════════════════════════════════════

/// `{"thread": {...}, ...}` as returned by the thread endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadEnvelope {
    pub thread: QuipThread,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuipThread {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub link: String,
    pub author_id: String,
    #[serde(rename = "type", default)]
    pub thread_type: String,
    /// Microseconds since the Unix epoch.
    #[serde(default)]
    pub updated_usec: i64,
}

impl TryFrom<ThreadEnvelope> for DocumentRef {
    type Error = DocumentPlatformError;

    fn try_from(envelope: ThreadEnvelope) -> Result<Self, Self::Error> {
        let thread = envelope.thread;
        let id = ThreadId::new(&thread.id)
            .map_err(|e| DocumentPlatformError::decode(format!("thread id: {}", e)))?;
        let author_id = UserId::new(&thread.author_id)
            .map_err(|e| DocumentPlatformError::decode(format!("author id of {}: {}", id, e)))?;
        let updated_at = DateTime::<Utc>::from_timestamp_micros(thread.updated_usec)
            .ok_or_else(|| {
                DocumentPlatformError::decode(format!("updated_usec of {} out of range", id))
            })?;

        Ok(DocumentRef {
            id,
            title: thread.title,
            link: thread.link,
            author_id,
            kind: DocumentKind::from_platform_type(&thread.thread_type),
            updated_at,
        })
    }
}

/// Decodes a list of envelopes, keeping platform order.
pub fn decode_threads(
    envelopes: impl IntoIterator<Item = ThreadEnvelope>,
) -> Result<Vec<DocumentRef>, DocumentPlatformError> {
    envelopes.into_iter().map(DocumentRef::try_from).collect()
}

/// Decodes the recent-threads object, an id-to-envelope map, in the order
/// the platform sent it.
pub fn decode_recent(body: serde_json::Value) -> Result<Vec<DocumentRef>, DocumentPlatformError> {
    let serde_json::Value::Object(entries) = body else {
        return Err(DocumentPlatformError::decode(
            "recent threads response is not an object",
        ));
    };

    let envelopes = entries
        .into_iter()
        .map(|(_, entry)| {
            serde_json::from_value::<ThreadEnvelope>(entry)
                .map_err(|e| DocumentPlatformError::decode(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    decode_threads(envelopes)
}

// ════════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct QuipUser {
    pub id: String,
    pub name: String,
}

/// The users endpoint answers a single id with a bare user object and
/// several ids with an id-to-user map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UsersResponse {
    Single(QuipUser),
    Many(HashMap<String, QuipUser>),
}

impl UsersResponse {
    pub fn into_names(self) -> HashMap<UserId, String> {
        let users: Vec<QuipUser> = match self {
            UsersResponse::Single(user) => vec![user],
            UsersResponse::Many(map) => map.into_values().collect(),
        };
        users
            .into_iter()
            .filter_map(|user| UserId::new(user.id).ok().map(|id| (id, user.name)))
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// PDF export
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct ExportCreated {
    #[serde(default)]
    pub request_id: Option<String>,
}

impl ExportCreated {
    /// The request id, if present and non-blank.
    pub fn into_request_id(self) -> Option<RequestId> {
        self.request_id.and_then(|id| RequestId::new(id).ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportStatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ExportStatusResponse> for ExportPoll {
    fn from(response: ExportStatusResponse) -> Self {
        let status = ExportStatus::from_platform(&response.status).unwrap_or_else(|| {
            tracing::debug!(status = %response.status, "Unknown export status, still processing");
            ExportStatus::Processing
        });
        ExportPoll {
            status,
            pdf_url: response.pdf_url,
            message: response.message,
        }
    }
}

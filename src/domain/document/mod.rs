//! Document module - Quip threads as seen by the bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ThreadId, UserId};

/// Kind of Quip thread.
///
/// Only documents can be exported to PDF; spreadsheets, chats and other
/// thread types are listed by the platform but skipped when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Document,
    Other,
}

impl DocumentKind {
    /// Classifies a raw Quip thread type string.
    pub fn from_platform_type(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("document") {
            DocumentKind::Document
        } else {
            DocumentKind::Other
        }
    }
}

/// A Quip thread reference, decoded once at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: ThreadId,
    pub title: String,
    pub link: String,
    pub author_id: UserId,
    pub kind: DocumentKind,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRef {
    /// Returns true if the thread is a document that can be exported.
    pub fn is_document(&self) -> bool {
        self.kind == DocumentKind::Document
    }

    /// File name used when the platform does not supply one.
    pub fn fallback_pdf_name(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            format!("{}.pdf", self.id)
        } else {
            format!("{}.pdf", title)
        }
    }
}

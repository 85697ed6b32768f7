//! ResultRenderer - document lists and export progress as chat messages.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use super::NameCache;
use crate::domain::document::DocumentRef;
use crate::domain::export::PdfLocation;
use crate::domain::foundation::{AccessToken, RequestId};
use crate::domain::message::{
    Block, ChatMessage, Element, DOWNLOAD_ACTION_ID, EXPORT_ACTION_ID,
};
use crate::ports::{DocumentPlatform, DocumentPlatformError};

pub const NOT_FOUND_TEXT: &str = "Not found.";
pub const EXPORT_BUTTON_LABEL: &str = "PDF";
pub const DOWNLOAD_BUTTON_LABEL: &str = "Download PDF";
pub const EXPORTING_HEADER: &str = "Exporting PDF";

const UPDATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Builds the chat messages the bot posts.
pub struct ResultRenderer {
    platform: Arc<dyn DocumentPlatform>,
}

impl ResultRenderer {
    pub fn new(platform: Arc<dyn DocumentPlatform>) -> Self {
        Self { platform }
    }

    /// Numbered list of documents, each with an export button.
    ///
    /// Threads that are not documents are skipped. Author names are resolved
    /// in one batch through the cache; an unknown author shows its raw id.
    pub async fn render_list(
        &self,
        names: &NameCache,
        token: &AccessToken,
        header: &str,
        documents: &[DocumentRef],
    ) -> Result<ChatMessage, DocumentPlatformError> {
        let documents: Vec<&DocumentRef> = documents.iter().filter(|d| d.is_document()).collect();

        let mut blocks = vec![Block::header(header), Block::Divider];

        if documents.is_empty() {
            blocks.push(Block::section(NOT_FOUND_TEXT));
            return Ok(ChatMessage::with_blocks(
                format!("{}\n{}", header, NOT_FOUND_TEXT),
                blocks,
            ));
        }

        let authors: BTreeSet<_> = documents.iter().map(|d| d.author_id.clone()).collect();
        let resolved = names.resolve(self.platform.as_ref(), token, &authors).await?;

        for (index, document) in documents.iter().enumerate() {
            let author = resolved
                .get(&document.author_id)
                .map(String::as_str)
                .unwrap_or_else(|| document.author_id.as_str());
            let line = format!(
                "{}. [{}] <{}|{}> (Author: {})\nLast updated: {}",
                index + 1,
                document.id,
                document.link,
                document.title,
                author,
                document.updated_at.format(UPDATED_AT_FORMAT),
            );
            blocks.push(Block::section_with_button(
                line,
                Element::action_button(EXPORT_BUTTON_LABEL, EXPORT_ACTION_ID, document.id.as_str()),
            ));
        }

        Ok(ChatMessage::with_blocks(
            format!("{} ({} documents)", header, documents.len()),
            blocks,
        ))
    }

    /// Progress notice posted once the export job is accepted.
    pub fn render_export_started(document: &DocumentRef, request_id: &RequestId) -> ChatMessage {
        let details = format!(
            "Title: <{}|{}>\nThread ID: {}\nRequest ID: {}",
            document.link, document.title, document.id, request_id
        );
        ChatMessage::with_blocks(
            format!("Exporting PDF of {}", document.title),
            vec![
                Block::header(EXPORTING_HEADER),
                Block::Divider,
                Block::section(details),
            ],
        )
    }

    /// Download button for a finished PDF, with an optional diagnostic.
    pub fn render_download(location: &PdfLocation, note: Option<&str>) -> ChatMessage {
        let mut text = format!("Generated PDF: {}", location.filename);
        if let Some(note) = note {
            text.push_str(&format!("\n_Partially generated: {}_", note));
        }
        ChatMessage::with_blocks(
            text.clone(),
            vec![
                Block::section(text),
                Block::Actions {
                    elements: vec![Element::link_button(
                        DOWNLOAD_BUTTON_LABEL,
                        DOWNLOAD_ACTION_ID,
                        location.url.as_str(),
                    )],
                },
            ],
        )
    }

    pub fn render_partial_note(message: &str) -> ChatMessage {
        ChatMessage::text(format!("The PDF was generated partially: {}", message))
    }

    pub fn render_export_failed(message: &str) -> ChatMessage {
        ChatMessage::text(format!("Failed to export PDF: {}", message))
    }

    pub fn render_timed_out(document: &DocumentRef, budget: Duration) -> ChatMessage {
        ChatMessage::text(format!(
            "Timed out waiting for the PDF export of {} ({} seconds).",
            document.title,
            budget.as_secs()
        ))
    }

    pub fn render_submission_failed(document: &DocumentRef, reason: &str) -> ChatMessage {
        ChatMessage::text(format!(
            "Failed to request a PDF export for {}: {}",
            document.title, reason
        ))
    }

    pub fn render_upload_failed(error: &str) -> ChatMessage {
        ChatMessage::text(format!("Failed to upload PDF: {}", error))
    }

    pub fn render_already_in_progress(document: &DocumentRef) -> ChatMessage {
        ChatMessage::text(format!(
            "An export of {} is already in progress.",
            document.title
        ))
    }

    pub fn render_thread_not_found(thread_id: &str) -> ChatMessage {
        ChatMessage::text(format!("Thread ID {} is not found.", thread_id))
    }

    pub fn render_platform_error(error: &DocumentPlatformError) -> ChatMessage {
        ChatMessage::text(format!(
            "Something went wrong while talking to Quip: {}",
            error
        ))
    }
}

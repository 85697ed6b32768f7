//! ExportRequest - the record of one asynchronous PDF export.

use serde::{Deserialize, Serialize};

use super::ExportStatus;
use crate::domain::foundation::{RequestId, StateMachine, ThreadId, ValidationError};

/// One status report from the platform for a running export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPoll {
    pub status: ExportStatus,
    pub pdf_url: Option<String>,
    pub message: Option<String>,
}

impl ExportPoll {
    /// A report that the export is still running.
    pub fn processing() -> Self {
        Self {
            status: ExportStatus::Processing,
            pdf_url: None,
            message: None,
        }
    }

    /// A successful report carrying the PDF URL.
    pub fn success(pdf_url: impl Into<String>) -> Self {
        Self {
            status: ExportStatus::Success,
            pdf_url: Some(pdf_url.into()),
            message: None,
        }
    }

    /// A partially successful report carrying the PDF URL and a diagnostic.
    pub fn partial_success(pdf_url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ExportStatus::PartialSuccess,
            pdf_url: Some(pdf_url.into()),
            message: Some(message.into()),
        }
    }

    /// A failure report carrying a diagnostic.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ExportStatus::Failure,
            pdf_url: None,
            message: Some(message.into()),
        }
    }
}

/// State of a submitted export job.
///
/// The status only moves forward: once terminal, every further report is
/// rejected and nothing about the request changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    request_id: RequestId,
    thread_id: ThreadId,
    status: ExportStatus,
    result_url: Option<String>,
    message: Option<String>,
    polls: u32,
}

impl ExportRequest {
    /// Creates the record for a freshly submitted export.
    pub fn new(request_id: RequestId, thread_id: ThreadId) -> Self {
        Self {
            request_id,
            thread_id,
            status: ExportStatus::Processing,
            result_url: None,
            message: None,
            polls: 0,
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn status(&self) -> ExportStatus {
        self.status
    }

    /// URL of the generated PDF, as delivered by the platform.
    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    /// Diagnostic message from the platform, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Number of status reports applied so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Applies a status report from the platform.
    ///
    /// A success without a PDF URL cannot be delivered and is recorded as a
    /// failure.
    pub fn record_poll(&mut self, poll: ExportPoll) -> Result<ExportStatus, ValidationError> {
        self.ensure_open(poll.status)?;
        if poll.status == ExportStatus::TimedOut {
            return Err(ValidationError::invalid_format(
                "status",
                "TimedOut is never reported by the platform",
            ));
        }
        self.polls += 1;

        match poll.status {
            ExportStatus::Processing | ExportStatus::TimedOut => {}
            ExportStatus::Success | ExportStatus::PartialSuccess => {
                match poll.pdf_url.filter(|url| !url.trim().is_empty()) {
                    Some(url) => {
                        self.status = self.status.transition_to(poll.status)?;
                        self.result_url = Some(url);
                        self.message = poll.message;
                    }
                    None => self.finish(
                        ExportStatus::Failure,
                        "export finished without a PDF URL".to_string(),
                    )?,
                }
            }
            ExportStatus::Failure => self.finish(
                ExportStatus::Failure,
                poll.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "no reason given".to_string()),
            )?,
        }

        Ok(self.status)
    }

    /// Marks the export as failed for a reason outside the platform report,
    /// such as a transport error while polling.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), ValidationError> {
        self.ensure_open(ExportStatus::Failure)?;
        self.finish(ExportStatus::Failure, message.into())
    }

    /// Marks the export as timed out after the poll budget ran out.
    pub fn time_out(&mut self) -> Result<(), ValidationError> {
        self.ensure_open(ExportStatus::TimedOut)?;
        self.status = self.status.transition_to(ExportStatus::TimedOut)?;
        Ok(())
    }

    fn ensure_open(&self, target: ExportStatus) -> Result<(), ValidationError> {
        if self.status.is_terminal() {
            return Err(ValidationError::invalid_transition(
                format!("{:?}", self.status),
                format!("{:?}", target),
            ));
        }
        Ok(())
    }

    fn finish(&mut self, status: ExportStatus, message: String) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(status)?;
        self.message = Some(message);
        Ok(())
    }
}

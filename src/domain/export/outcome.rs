//! Terminal outcomes of an export job invocation.

use serde::Deserialize;

use super::{ExportRequest, ExportStatus};
use crate::domain::foundation::ThreadId;

/// How a finished PDF reaches the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactDelivery {
    /// Fetch the PDF and upload it as a file.
    #[default]
    Upload,
    /// Post a download button pointing at the PDF URL.
    Link,
}

/// What happened to the PDF of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactResult {
    /// A download link to the corrected URL was posted.
    Linked { url: String },
    /// The PDF was uploaded under its unescaped file name.
    Uploaded { filename: String },
    /// The PDF could not be fetched, stored or uploaded.
    DeliveryFailed { error: String },
}

/// Terminal outcome of one export job invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Another export of the same thread is still running.
    AlreadyInProgress { thread_id: ThreadId },
    /// The platform did not hand out a job id; nothing was polled.
    SubmissionFailed { thread_id: ThreadId, reason: String },
    /// Success or PartialSuccess, with the delivery result.
    Completed {
        request: ExportRequest,
        artifact: ArtifactResult,
    },
    /// The platform reported a failure, or polling broke down.
    Failed {
        request: ExportRequest,
        message: String,
    },
    /// The poll budget ran out while the job was still processing.
    TimedOut { request: ExportRequest },
}

impl ExportOutcome {
    /// Final status of the job, if one was submitted.
    pub fn status(&self) -> Option<ExportStatus> {
        match self {
            ExportOutcome::AlreadyInProgress { .. } | ExportOutcome::SubmissionFailed { .. } => None,
            ExportOutcome::Completed { request, .. }
            | ExportOutcome::Failed { request, .. }
            | ExportOutcome::TimedOut { request } => Some(request.status()),
        }
    }
}

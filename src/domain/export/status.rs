//! Export job status state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Status of an asynchronous PDF export.
///
/// ```text
/// Processing ──┬──> Success
///              ├──> PartialSuccess
///              ├──> Failure
///              └──> TimedOut
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportStatus {
    Processing,
    Success,
    PartialSuccess,
    Failure,
    /// Never reported by the platform; reached when the poll budget runs out.
    TimedOut,
}

impl ExportStatus {
    /// Parses a status string as reported by Quip.
    ///
    /// Returns `None` for statuses this bot does not know about.
    pub fn from_platform(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PROCESSING" => Some(ExportStatus::Processing),
            "SUCCESS" => Some(ExportStatus::Success),
            "PARTIAL_SUCCESS" => Some(ExportStatus::PartialSuccess),
            "FAILURE" => Some(ExportStatus::Failure),
            _ => None,
        }
    }

    /// True for the two statuses that carry a PDF.
    pub fn has_artifact(&self) -> bool {
        matches!(self, ExportStatus::Success | ExportStatus::PartialSuccess)
    }
}

impl StateMachine for ExportStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ExportStatus::*;
        matches!(
            (self, target),
            (Processing, Success)
                | (Processing, PartialSuccess)
                | (Processing, Failure)
                | (Processing, TimedOut)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ExportStatus::*;
        match self {
            Processing => vec![Success, PartialSuccess, Failure, TimedOut],
            Success | PartialSuccess | Failure | TimedOut => vec![],
        }
    }
}

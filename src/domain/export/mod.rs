//! Export module - the PDF export job lifecycle.
//!
//! ```text
//! Initiated ──(no request id)──────────────> SubmissionFailed
//!     │
//!     └──> Processing ──┬──> Success ─────────┐
//!                       ├──> PartialSuccess ──┴──> artifact delivery
//!                       ├──> Failure
//!                       └──> TimedOut (poll budget exhausted)
//! ```

mod outcome;
mod pdf_url;
mod request;
mod status;

pub use outcome::{ArtifactDelivery, ArtifactResult, ExportOutcome};
pub use pdf_url::{correct_pdf_url, PdfLocation, FILENAME_PARAM};
pub use request::{ExportPoll, ExportRequest};
pub use status::ExportStatus;

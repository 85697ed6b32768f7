//! Application layer - orchestration over the ports.
//!
//! The router is the single entry point used by the HTTP adapter. It resolves
//! documents, renders lists and hands single documents to the export job.

mod context;
mod document_resolver;
mod export_job;
mod interaction_router;
mod name_cache;
mod result_renderer;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{BotContext, CredentialSlot, InFlightExports, InFlightGuard};
pub use document_resolver::{DocumentResolver, Resolution};
pub use export_job::{ExportJob, ExportSettings, PollSchedule};
pub use interaction_router::{
    Interaction, InteractionError, InteractionRouter, RouteOutcome, RECENT_HEADER,
    TOKEN_INVALID_TEXT, TOKEN_MISSING_TEXT, TOKEN_VERIFIED_TEXT,
};
pub use name_cache::NameCache;
pub use result_renderer::{
    ResultRenderer, DOWNLOAD_BUTTON_LABEL, EXPORTING_HEADER, EXPORT_BUTTON_LABEL, NOT_FOUND_TEXT,
};

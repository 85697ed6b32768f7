//! HTTP adapter for Slack endpoints.
//!
//! Receives Slack's signed form posts and hands them to the interaction
//! router:
//! - `POST /slack/commands` - Slash command (`/quiptopdf [argument]`)
//! - `POST /slack/interactions` - Block action (export button click)
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{SlackApiError, SlackAppState};
pub use routes::slack_router;

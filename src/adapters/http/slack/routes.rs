//! Route configuration for Slack endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, interaction, slash_command, SlackAppState};

/// Creates the Slack router.
///
/// Routes:
/// - `POST /slack/commands` - Slash command
/// - `POST /slack/interactions` - Block actions
/// - `GET /health` - Liveness probe
pub fn slack_router() -> Router<SlackAppState> {
    Router::new()
        .route("/slack/commands", post(slash_command))
        .route("/slack/interactions", post(interaction))
        .route("/health", get(health))
}

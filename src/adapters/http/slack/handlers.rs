//! HTTP handlers for Slack endpoints.
//!
//! Every request is signature-checked against the raw body before it is
//! parsed. Accepted interactions are acknowledged immediately and processed
//! on a spawned task, since Slack expects an answer within three seconds and
//! an export can take minutes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::Instrument;
use uuid::Uuid;

use crate::adapters::slack::{
    BlockActionsPayload, InteractionRequest, PayloadError, SignatureError, SlackSignatureVerifier,
    SlashCommand, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
use crate::application::{Interaction, InteractionRouter};

use super::dto::{ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the Slack endpoints.
#[derive(Clone)]
pub struct SlackAppState {
    pub router: Arc<InteractionRouter>,
    pub verifier: SlackSignatureVerifier,
}

impl SlackAppState {
    pub fn new(router: Arc<InteractionRouter>, verifier: SlackSignatureVerifier) -> Self {
        Self { router, verifier }
    }

    fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), SlackApiError> {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        self.verifier
            .verify(header(TIMESTAMP_HEADER), header(SIGNATURE_HEADER), body)
            .map_err(SlackApiError::from)
    }

    /// Runs the interaction in the background under its own span.
    fn dispatch(&self, interaction: Interaction) {
        let router = self.router.clone();
        let span = tracing::info_span!(
            "interaction",
            interaction_id = %Uuid::new_v4(),
            channel = %interaction.channel(),
        );
        tokio::spawn(
            async move {
                let outcome = router.handle(interaction).await;
                tracing::info!(?outcome, "Interaction finished");
            }
            .instrument(span),
        );
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /slack/commands
pub async fn slash_command(
    State(state): State<SlackAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, SlackApiError> {
    state.verify(&headers, &body)?;

    let command = SlashCommand::parse(&body)?;
    tracing::debug!(
        command = %command.command,
        has_argument = command.text.is_some(),
        "Slash command received"
    );

    state.dispatch(command.into_interaction());
    Ok(StatusCode::OK)
}

/// POST /slack/interactions
pub async fn interaction(
    State(state): State<SlackAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, SlackApiError> {
    state.verify(&headers, &body)?;

    match BlockActionsPayload::parse(&body)?.into_request()? {
        InteractionRequest::Export(interaction) => state.dispatch(interaction),
        InteractionRequest::Ignored => tracing::debug!("Ignoring non-export action"),
    }
    Ok(StatusCode::OK)
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts request failures to HTTP responses.
#[derive(Debug)]
pub enum SlackApiError {
    Signature(SignatureError),
    Payload(PayloadError),
}

impl From<SignatureError> for SlackApiError {
    fn from(err: SignatureError) -> Self {
        Self::Signature(err)
    }
}

impl From<PayloadError> for SlackApiError {
    fn from(err: PayloadError) -> Self {
        Self::Payload(err)
    }
}

impl IntoResponse for SlackApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match &self {
            SlackApiError::Signature(err) => {
                (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE", err.to_string())
            }
            SlackApiError::Payload(err) => {
                (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD", err.to_string())
            }
        };

        tracing::warn!(status = status.as_u16(), error_code, %message, "Rejected Slack request");
        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}

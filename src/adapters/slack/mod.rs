//! Slack adapter.
//!
//! - `SlackChatAdapter` implements the `ChatPlatform` port (messages, uploads)
//! - `SlackSignatureVerifier` checks inbound request signatures
//! - `SlashCommand` / `BlockActionsPayload` parse inbound form bodies
//!
//! # Security
//!
//! - Request signatures use HMAC-SHA256 with constant-time comparison
//! - Timestamps are validated to prevent replay attacks (5-minute window)
//! - Bot token and signing secret are handled via `secrecy::SecretString`

mod chat_adapter;
mod payloads;
mod signature;

pub use chat_adapter::{SlackChatAdapter, SlackConfig, DEFAULT_SLACK_API_URL};
pub use payloads::{BlockActionsPayload, InteractionRequest, PayloadError, SlashCommand};
pub use signature::{SignatureError, SlackSignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};

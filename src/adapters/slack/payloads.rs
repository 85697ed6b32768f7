//! Inbound Slack payloads: slash commands and block actions.
//!
//! Both arrive as `application/x-www-form-urlencoded` bodies. Interactions
//! carry their JSON document in the `payload` form field.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::application::Interaction;
use crate::domain::foundation::ChannelId;
use crate::domain::message::EXPORT_ACTION_ID;

/// Errors parsing an inbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("unsupported interaction: {0}")]
    Unsupported(String),
}

fn form_fields(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Slash commands
// ════════════════════════════════════════════════════════════════════════════════

/// A slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub command: String,
    pub text: Option<String>,
    pub channel_id: ChannelId,
    pub user_id: Option<String>,
}

impl SlashCommand {
    /// Parses the form-encoded command body.
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        let mut fields = form_fields(body);

        let channel_id = fields
            .remove("channel_id")
            .ok_or(PayloadError::MissingField("channel_id"))?;
        let channel_id = ChannelId::new(channel_id).map_err(|e| PayloadError::InvalidField {
            field: "channel_id",
            reason: e.to_string(),
        })?;

        Ok(Self {
            command: fields.remove("command").unwrap_or_default(),
            text: fields
                .remove("text")
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            channel_id,
            user_id: fields.remove("user_id"),
        })
    }

    pub fn into_interaction(self) -> Interaction {
        Interaction::Command {
            argument: self.text,
            channel: self.channel_id,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Block actions
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct BlockActionsPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub actions: Vec<BlockAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockAction {
    pub action_id: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// What an interaction request asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionRequest {
    /// Export button click.
    Export(Interaction),
    /// An action the bot has nothing to do for, such as a link button.
    Ignored,
}

impl BlockActionsPayload {
    /// Parses the form-encoded interaction body.
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        let payload = form_fields(body)
            .remove("payload")
            .ok_or(PayloadError::MissingField("payload"))?;
        serde_json::from_str(&payload).map_err(|e| PayloadError::InvalidField {
            field: "payload",
            reason: e.to_string(),
        })
    }

    /// Maps the first action onto an export request.
    pub fn into_request(self) -> Result<InteractionRequest, PayloadError> {
        if self.payload_type != "block_actions" {
            return Err(PayloadError::Unsupported(self.payload_type));
        }

        let action = self
            .actions
            .into_iter()
            .next()
            .ok_or(PayloadError::MissingField("actions"))?;
        if action.action_id != EXPORT_ACTION_ID {
            return Ok(InteractionRequest::Ignored);
        }

        let thread_id = action
            .value
            .filter(|value| !value.trim().is_empty())
            .ok_or(PayloadError::MissingField("actions[0].value"))?;
        let channel = self
            .channel
            .ok_or(PayloadError::MissingField("channel"))?;
        let channel = ChannelId::new(channel.id).map_err(|e| PayloadError::InvalidField {
            field: "channel.id",
            reason: e.to_string(),
        })?;

        Ok(InteractionRequest::Export(Interaction::ButtonClick {
            thread_id,
            channel,
        }))
    }
}

//! Slack configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::slack::DEFAULT_SLACK_API_URL;

/// Slack app configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// Bot user OAuth token (xoxb-...)
    pub bot_token: SecretString,

    /// Signing secret used to verify inbound requests
    pub signing_secret: SecretString,

    /// Web API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds for Web API calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl SlackConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate Slack configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("SLACK__BOT_TOKEN"));
        }
        if self.signing_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("SLACK__SIGNING_SECRET"));
        }
        if !self.bot_token.expose_secret().starts_with("xoxb-") {
            return Err(ValidationError::InvalidBotToken);
        }
        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(ValidationError::InvalidUrl("Slack API"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    DEFAULT_SLACK_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

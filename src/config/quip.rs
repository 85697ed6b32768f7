//! Quip configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::quip::DEFAULT_QUIP_BASE_URL;

/// Quip platform configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QuipConfig {
    /// Platform API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Personal access token verified at startup; the bot can also be
    /// given one later through the slash command.
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl QuipConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured access token, ignoring blank values
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_ref()
            .map(|token| token.expose_secret().trim())
            .filter(|token| !token.is_empty())
    }

    /// Validate Quip configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let url = url::Url::parse(&self.base_url).map_err(|_| ValidationError::InvalidUrl("Quip"))?;
        if *environment == Environment::Production && url.scheme() != "https" {
            return Err(ValidationError::UrlMustBeHttps("Quip"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for QuipConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_QUIP_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuipConfig::default();
        assert_eq!(config.base_url, "https://platform.quip.com");
        assert_eq!(config.access_token(), None);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_blank_token_is_none() {
        let config = QuipConfig {
            access_token: Some(SecretString::new("   ".to_string())),
            ..Default::default()
        };
        assert_eq!(config.access_token(), None);
    }

    #[test]
    fn test_http_allowed_outside_production() {
        let config = QuipConfig {
            base_url: "http://localhost:9000".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::UrlMustBeHttps("Quip"))
        );
    }

    #[test]
    fn test_invalid_url() {
        let config = QuipConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidUrl("Quip"))
        );
    }
}

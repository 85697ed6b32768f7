//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `QUIP_PDF` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use quip_pdf_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod export;
mod quip;
mod server;
mod slack;

pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;
pub use quip::QuipConfig;
pub use server::{Environment, ServerConfig};
pub use slack::SlackConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Slack app credentials
    pub slack: SlackConfig,

    /// Quip platform settings and optional startup token
    #[serde(default)]
    pub quip: QuipConfig,

    /// Export polling and delivery
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `QUIP_PDF` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `QUIP_PDF__SERVER__PORT=3000` -> `server.port = 3000`
    /// - `QUIP_PDF__SLACK__BOT_TOKEN=...` -> `slack.bot_token = ...`
    /// - `QUIP_PDF__EXPORT__DELIVERY=link` -> `export.delivery = Link`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("QUIP_PDF")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.slack.validate()?;
        self.quip.validate(&self.server.environment)?;
        self.export.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

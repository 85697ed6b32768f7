//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address")]
    InvalidHost,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid {0} URL")]
    InvalidUrl(&'static str),

    #[error("{0} URL must use HTTPS in production")]
    UrlMustBeHttps(&'static str),

    #[error("Invalid Slack bot token format")]
    InvalidBotToken,

    #[error("Poll interval must be between 1 and 60 seconds")]
    InvalidPollInterval,

    #[error("Max poll attempts must be between 1 and 1000")]
    InvalidPollAttempts,
}

//! Quip access token value object.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ValidationError;

/// Bearer token for the Quip platform API.
///
/// The raw value is only reachable through [`AccessToken::expose`], which the
/// HTTP adapter calls when building the `Authorization` header.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wraps a raw token, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("access_token"));
        }
        Ok(Self(SecretString::new(trimmed.to_string())))
    }

    /// Exposes the raw token value.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

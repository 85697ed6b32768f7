//! Slack request signature verification.
//!
//! Slack signs every request with `v0=HMAC-SHA256(secret, "v0:{ts}:{body}")`
//! and sends the timestamp alongside.
//!
//! # Security
//!
//! - Constant-time comparison of the signature
//! - Timestamps older than 5 minutes are rejected to prevent replay
//! - The signing secret is held as a `secrecy::SecretString`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request timestamp.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

const SIGNATURE_VERSION: &str = "v0";

/// Maximum age for signed requests (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Why a request signature was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),

    #[error("invalid timestamp")]
    InvalidTimestamp,

    #[error("request too old ({0} seconds)")]
    Expired(i64),

    #[error("request timestamp in future")]
    FromFuture,

    #[error("invalid signature format")]
    InvalidFormat,

    #[error("signature mismatch")]
    Mismatch,
}

/// Verifies inbound Slack requests.
#[derive(Clone)]
pub struct SlackSignatureVerifier {
    signing_secret: SecretString,
}

impl SlackSignatureVerifier {
    pub fn new(signing_secret: SecretString) -> Self {
        Self { signing_secret }
    }

    /// Verifies a request against the current time.
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        self.verify_at(chrono::Utc::now().timestamp(), timestamp, signature, body)
    }

    /// Verifies a request as if the current Unix time were `now`.
    pub fn verify_at(
        &self,
        now: i64,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        let timestamp = timestamp.ok_or(SignatureError::MissingHeader(TIMESTAMP_HEADER))?;
        let signature = signature.ok_or(SignatureError::MissingHeader(SIGNATURE_HEADER))?;

        // 1. Validate timestamp
        let sent_at: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp)?;
        let age = now - sent_at;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                request_timestamp = sent_at,
                current_time = now,
                age_secs = age,
                "Slack request too old - possible replay attack"
            );
            return Err(SignatureError::Expired(age));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                request_timestamp = sent_at,
                current_time = now,
                "Slack request from future - clock skew or manipulation"
            );
            return Err(SignatureError::FromFuture);
        }

        // 2. Decode provided signature
        let provided = signature
            .trim()
            .strip_prefix("v0=")
            .and_then(hex_decode)
            .ok_or(SignatureError::InvalidFormat)?;

        // 3. Constant-time comparison
        let expected = self.compute(timestamp.trim(), body);
        if expected.as_slice().ct_eq(&provided).unwrap_u8() != 1 {
            tracing::warn!("Invalid Slack request signature");
            return Err(SignatureError::Mismatch);
        }

        Ok(())
    }

    /// Signature header value for a request, as Slack would send it.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> String {
        format!("{}={}", SIGNATURE_VERSION, hex_encode(&self.compute(timestamp, body)))
    }

    fn compute(&self, timestamp: &str, body: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Decode hex string to bytes.
fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let byte = u8::from_str_radix(&hex[i..i + 2], 16).ok()?;
        bytes.push(byte);
    }
    Some(bytes)
}

/// Encode bytes to hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

//! HTTP adapters - inbound endpoints.

pub mod slack;

// Re-export key types for convenience
pub use slack::slack_router;
pub use slack::SlackAppState;

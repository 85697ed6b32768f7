//! Sleeper port - the delay between export status checks.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the caller for a duration.
///
/// Production uses the tokio timer; tests record the requested delays and
/// return immediately.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

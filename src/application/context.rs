//! BotContext - process-wide state shared by every interaction.
//!
//! Holds the verified Quip credential, the author name cache and the set of
//! threads with an export in flight. Components receive the context
//! explicitly instead of reaching for globals, and each piece of state sits
//! behind its own lock.

use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::RwLock;

use super::NameCache;
use crate::domain::foundation::{AccessToken, ThreadId};
use crate::ports::{DocumentPlatform, DocumentPlatformError};

/// State shared by all handlers of one process.
#[derive(Default)]
pub struct BotContext {
    credential: CredentialSlot,
    names: NameCache,
    in_flight: InFlightExports,
}

impl BotContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that starts with an already verified token.
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            credential: CredentialSlot::with_token(token),
            ..Self::default()
        }
    }

    pub fn credential(&self) -> &CredentialSlot {
        &self.credential
    }

    pub fn names(&self) -> &NameCache {
        &self.names
    }

    pub fn in_flight(&self) -> &InFlightExports {
        &self.in_flight
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Credential
// ════════════════════════════════════════════════════════════════════════════════

/// Holds at most one verified Quip access token.
#[derive(Default)]
pub struct CredentialSlot {
    token: RwLock<Option<AccessToken>>,
}

impl CredentialSlot {
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }

    /// The active token, if one has been verified.
    pub async fn current(&self) -> Option<AccessToken> {
        self.token.read().await.clone()
    }

    /// Verifies `candidate` against the platform.
    ///
    /// A valid token replaces the active one; a rejected token clears the
    /// slot. On a transport error the slot is left untouched.
    pub async fn verify_and_store(
        &self,
        platform: &dyn DocumentPlatform,
        candidate: AccessToken,
    ) -> Result<bool, DocumentPlatformError> {
        let valid = platform.verify_token(&candidate).await?;

        let mut slot = self.token.write().await;
        if valid {
            *slot = Some(candidate);
            tracing::info!("Quip access token verified");
        } else {
            *slot = None;
            tracing::warn!("Quip access token rejected");
        }
        Ok(valid)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// In-flight exports
// ════════════════════════════════════════════════════════════════════════════════

/// Threads with an export currently running.
///
/// A second export of the same thread is refused until the first one ends.
#[derive(Default)]
pub struct InFlightExports {
    active: Mutex<HashSet<ThreadId>>,
}

impl InFlightExports {
    /// Claims `thread_id`, or returns `None` if an export already holds it.
    pub fn try_acquire(&self, thread_id: &ThreadId) -> Option<InFlightGuard<'_>> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(thread_id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            registry: self,
            thread_id: thread_id.clone(),
        })
    }

    pub fn is_active(&self, thread_id: &ThreadId) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(thread_id)
    }
}

/// Releases the claimed thread when dropped.
pub struct InFlightGuard<'a> {
    registry: &'a InFlightExports,
    thread_id: ThreadId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.thread_id);
    }
}

//! NameCache - memoized author id to display name lookups.

use std::collections::{BTreeSet, HashMap};
use tokio::sync::Mutex;

use crate::domain::foundation::{AccessToken, UserId};
use crate::ports::{DocumentPlatform, DocumentPlatformError};

/// Process-wide cache of user display names.
///
/// Entries are written once and never evicted. Ids the platform does not
/// know are not cached, so a later call asks for them again.
#[derive(Default)]
pub struct NameCache {
    names: Mutex<HashMap<UserId, String>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns names for `ids`, fetching only the ones not cached yet.
    ///
    /// Missing ids go out in a single batched lookup. The lock is held across
    /// that lookup, so concurrent callers never fetch the same id twice.
    pub async fn resolve(
        &self,
        platform: &dyn DocumentPlatform,
        token: &AccessToken,
        ids: &BTreeSet<UserId>,
    ) -> Result<HashMap<UserId, String>, DocumentPlatformError> {
        let mut names = self.names.lock().await;

        let missing: Vec<UserId> = ids
            .iter()
            .filter(|id| !names.contains_key(*id))
            .cloned()
            .collect();

        if !missing.is_empty() {
            tracing::debug!(count = missing.len(), "Fetching author names");
            let fetched = platform.get_users(token, &missing).await?;
            for (id, name) in fetched {
                names.entry(id).or_insert(name);
            }
        }

        Ok(ids
            .iter()
            .filter_map(|id| names.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }

    /// Number of cached names.
    pub async fn len(&self) -> usize {
        self.names.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.names.lock().await.is_empty()
    }
}

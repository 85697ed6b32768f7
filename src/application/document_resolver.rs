//! DocumentResolver - turns a command argument into Quip documents.

use std::sync::Arc;

use crate::domain::document::DocumentRef;
use crate::domain::foundation::{has_thread_id_length, AccessToken, ThreadId};
use crate::ports::{DocumentPlatform, DocumentPlatformError, SEARCH_PAGE_SIZE};

/// What a command argument resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No argument: the user's recent threads.
    Recent(Vec<DocumentRef>),
    /// The argument was an id of an existing thread.
    ById(DocumentRef),
    /// Title search results, in platform ranking order.
    Search {
        query: String,
        results: Vec<DocumentRef>,
    },
}

/// Resolves documents by id, by title search, or as a recent listing.
pub struct DocumentResolver {
    platform: Arc<dyn DocumentPlatform>,
}

impl DocumentResolver {
    pub fn new(platform: Arc<dyn DocumentPlatform>) -> Self {
        Self { platform }
    }

    /// Fetches one thread by exact id.
    ///
    /// A malformed id is a miss, same as a thread the platform does not
    /// return.
    pub async fn by_id(
        &self,
        token: &AccessToken,
        raw_id: &str,
    ) -> Result<Option<DocumentRef>, DocumentPlatformError> {
        let Ok(thread_id) = ThreadId::new(raw_id.trim()) else {
            return Ok(None);
        };
        self.platform.get_thread(token, &thread_id).await
    }

    /// Title search, at most one page of results.
    pub async fn search(
        &self,
        token: &AccessToken,
        query: &str,
    ) -> Result<Vec<DocumentRef>, DocumentPlatformError> {
        let mut results = self
            .platform
            .search_threads(token, query, SEARCH_PAGE_SIZE)
            .await?;
        results.truncate(SEARCH_PAGE_SIZE);
        Ok(results)
    }

    /// Recently viewed threads, in platform order.
    pub async fn recent(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<DocumentRef>, DocumentPlatformError> {
        self.platform.recent_threads(token).await
    }

    /// Applies the command argument policy.
    ///
    /// An argument shaped like a thread id is looked up directly first; only
    /// on a miss does it fall back to a title search.
    pub async fn resolve(
        &self,
        token: &AccessToken,
        argument: Option<&str>,
    ) -> Result<Resolution, DocumentPlatformError> {
        let argument = argument.map(str::trim).filter(|arg| !arg.is_empty());

        let Some(argument) = argument else {
            return Ok(Resolution::Recent(self.recent(token).await?));
        };

        if has_thread_id_length(argument) {
            if let Some(document) = self.by_id(token, argument).await? {
                return Ok(Resolution::ById(document));
            }
            tracing::debug!(argument, "No thread with this id, falling back to search");
        }

        Ok(Resolution::Search {
            query: argument.to_string(),
            results: self.search(token, argument).await?,
        })
    }
}

//! Hand-written port doubles shared by the application unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::domain::document::{DocumentKind, DocumentRef};
use crate::domain::export::ExportPoll;
use crate::domain::foundation::{AccessToken, ChannelId, RequestId, ThreadId, UserId};
use crate::domain::message::ChatMessage;
use crate::ports::{
    ChatError, ChatPlatform, DocumentPlatform, DocumentPlatformError, FileUpload, ScratchError,
    ScratchStorage, Sleeper,
};

pub fn document(id: &str, title: &str, author: &str) -> DocumentRef {
    DocumentRef {
        id: ThreadId::new(id).unwrap(),
        title: title.to_string(),
        link: format!("https://quip.com/{}", id),
        author_id: UserId::new(author).unwrap(),
        kind: DocumentKind::Document,
        updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

pub fn token() -> AccessToken {
    AccessToken::new("test-token").unwrap()
}

pub fn channel() -> ChannelId {
    ChannelId::new("C0123456").unwrap()
}

// ════════════════════════════════════════════════════════════════════════════════
// Document platform
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockDocumentPlatform {
    valid_tokens: Vec<String>,
    users: HashMap<UserId, String>,
    threads: HashMap<ThreadId, DocumentRef>,
    search_results: Vec<DocumentRef>,
    recent: Vec<DocumentRef>,
    export_request_id: Option<String>,
    polls: Mutex<VecDeque<Result<ExportPoll, DocumentPlatformError>>>,
    pdf_bytes: Vec<u8>,
    fail_users: bool,
    fail_search: bool,
    fail_fetch: bool,
    calls: Mutex<Vec<String>>,
    user_lookups: Mutex<Vec<Vec<UserId>>>,
}

impl MockDocumentPlatform {
    pub fn new() -> Self {
        Self {
            pdf_bytes: b"%PDF-1.4 test".to_vec(),
            ..Self::default()
        }
    }

    pub fn accepting_token(mut self, token: &str) -> Self {
        self.valid_tokens.push(token.to_string());
        self
    }

    pub fn with_user(mut self, id: &str, name: &str) -> Self {
        self.users.insert(UserId::new(id).unwrap(), name.to_string());
        self
    }

    pub fn with_thread(mut self, doc: DocumentRef) -> Self {
        self.threads.insert(doc.id.clone(), doc);
        self
    }

    pub fn with_search_results(mut self, docs: Vec<DocumentRef>) -> Self {
        self.search_results = docs;
        self
    }

    pub fn with_recent(mut self, docs: Vec<DocumentRef>) -> Self {
        self.recent = docs;
        self
    }

    pub fn with_export(mut self, request_id: &str) -> Self {
        self.export_request_id = Some(request_id.to_string());
        self
    }

    pub fn with_polls(self, polls: Vec<ExportPoll>) -> Self {
        *self.polls.lock().unwrap() = polls.into_iter().map(Ok).collect();
        self
    }

    pub fn with_poll_error(self, error: DocumentPlatformError) -> Self {
        self.polls.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn failing_users(mut self) -> Self {
        self.fail_users = true;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn user_lookups(&self) -> Vec<Vec<UserId>> {
        self.user_lookups.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("poll:")).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DocumentPlatform for MockDocumentPlatform {
    async fn verify_token(&self, token: &AccessToken) -> Result<bool, DocumentPlatformError> {
        self.record("verify_token".to_string());
        Ok(self.valid_tokens.iter().any(|t| t == token.expose()))
    }

    async fn get_users(
        &self,
        _token: &AccessToken,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, String>, DocumentPlatformError> {
        self.record("get_users".to_string());
        self.user_lookups.lock().unwrap().push(ids.to_vec());
        if self.fail_users {
            return Err(DocumentPlatformError::network("users unavailable"));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }

    async fn search_threads(
        &self,
        _token: &AccessToken,
        query: &str,
        count: usize,
    ) -> Result<Vec<DocumentRef>, DocumentPlatformError> {
        self.record(format!("search:{}", query));
        if self.fail_search {
            return Err(DocumentPlatformError::api(500, "search exploded"));
        }
        Ok(self.search_results.iter().take(count).cloned().collect())
    }

    async fn recent_threads(
        &self,
        _token: &AccessToken,
    ) -> Result<Vec<DocumentRef>, DocumentPlatformError> {
        self.record("recent".to_string());
        Ok(self.recent.clone())
    }

    async fn get_thread(
        &self,
        _token: &AccessToken,
        thread_id: &ThreadId,
    ) -> Result<Option<DocumentRef>, DocumentPlatformError> {
        self.record(format!("get_thread:{}", thread_id));
        Ok(self.threads.get(thread_id).cloned())
    }

    async fn create_pdf_export(
        &self,
        _token: &AccessToken,
        thread_id: &ThreadId,
    ) -> Result<Option<RequestId>, DocumentPlatformError> {
        self.record(format!("create_export:{}", thread_id));
        Ok(self
            .export_request_id
            .as_ref()
            .and_then(|id| RequestId::new(id.clone()).ok()))
    }

    async fn poll_pdf_export(
        &self,
        _token: &AccessToken,
        _thread_id: &ThreadId,
        request_id: &RequestId,
    ) -> Result<ExportPoll, DocumentPlatformError> {
        self.record(format!("poll:{}", request_id));
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExportPoll::processing()))
    }

    async fn fetch_pdf(
        &self,
        _token: &AccessToken,
        url: &Url,
    ) -> Result<Vec<u8>, DocumentPlatformError> {
        self.record(format!("fetch:{}", url));
        if self.fail_fetch {
            return Err(DocumentPlatformError::api(403, "forbidden"));
        }
        Ok(self.pdf_bytes.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Chat platform
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct RecordingChat {
    messages: Mutex<Vec<(ChannelId, ChatMessage)>>,
    uploads: Mutex<Vec<(ChannelId, FileUpload)>>,
    fail_upload: bool,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_upload() -> Self {
        Self {
            fail_upload: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.messages().into_iter().map(|m| m.text).collect()
    }

    pub fn uploads(&self) -> Vec<FileUpload> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(_, u)| u.clone())
            .collect()
    }
}

#[async_trait]
impl ChatPlatform for RecordingChat {
    async fn post_message(
        &self,
        channel: &ChannelId,
        message: &ChatMessage,
    ) -> Result<(), ChatError> {
        self.messages
            .lock()
            .unwrap()
            .push((channel.clone(), message.clone()));
        Ok(())
    }

    async fn upload_file(
        &self,
        channel: &ChannelId,
        upload: &FileUpload,
    ) -> Result<(), ChatError> {
        self.uploads
            .lock()
            .unwrap()
            .push((channel.clone(), upload.clone()));
        if self.fail_upload {
            return Err(ChatError::api("not_allowed_token_type"));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Scratch storage and sleeper
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MemoryScratch {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    written: Mutex<Vec<PathBuf>>,
    fail_write: bool,
}

impl MemoryScratch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_write() -> Self {
        Self {
            fail_write: true,
            ..Self::default()
        }
    }

    pub fn live_files(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn written(&self) -> Vec<PathBuf> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScratchStorage for MemoryScratch {
    async fn write(&self, request_id: &RequestId, bytes: &[u8]) -> Result<PathBuf, ScratchError> {
        if self.fail_write {
            return Err(ScratchError::io("disk full"));
        }
        let path = self.path_for(request_id);
        self.files.lock().unwrap().insert(path.clone(), bytes.to_vec());
        self.written.lock().unwrap().push(path.clone());
        Ok(path)
    }

    async fn remove(&self, path: &Path) -> Result<(), ScratchError> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn path_for(&self, request_id: &RequestId) -> PathBuf {
        PathBuf::from("/scratch").join(format!("{}.pdf", request_id.file_stem()))
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.delays().into_iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

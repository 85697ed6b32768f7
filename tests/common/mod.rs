//! Shared test infrastructure: a local HTTP stub that answers like Quip and
//! Slack, plus helpers that wire the real adapters against it.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Form, Path as UrlPath, Query, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{json, Map, Value};

use quip_pdf_bot::adapters::{
    LocalScratchStorage, QuipConfig, QuipDocumentAdapter, SlackChatAdapter, SlackConfig,
};
use quip_pdf_bot::application::{
    BotContext, ExportJob, ExportSettings, InteractionRouter, PollSchedule,
};
use quip_pdf_bot::domain::export::ArtifactDelivery;
use quip_pdf_bot::domain::foundation::{AccessToken, ChannelId};
use quip_pdf_bot::ports::Sleeper;

pub const QUIP_TOKEN: &str = "quip-test-token";
pub const CHANNEL: &str = "C0123456";
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

/// 2024-03-01 12:00:00 UTC in microseconds.
const UPDATED_USEC: i64 = 1_709_294_400_000_000;

// =============================================================================
// Stub builder
// =============================================================================

#[derive(Default)]
pub struct StubBuilder {
    threads: Vec<(String, String, String)>,
    recent: Vec<String>,
    search: Vec<String>,
    users: Vec<(String, String)>,
    request_id: Option<String>,
    polls: Vec<PollReply>,
}

#[derive(Debug, Clone)]
struct PollReply {
    status: &'static str,
    pdf_path: Option<String>,
    message: Option<String>,
}

impl StubBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread(mut self, id: &str, title: &str, author_id: &str) -> Self {
        self.threads
            .push((id.to_string(), title.to_string(), author_id.to_string()));
        self
    }

    pub fn recent(mut self, ids: &[&str]) -> Self {
        self.recent = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn search_hits(mut self, ids: &[&str]) -> Self {
        self.search = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn user(mut self, id: &str, name: &str) -> Self {
        self.users.push((id.to_string(), name.to_string()));
        self
    }

    pub fn export(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    pub fn processing(mut self) -> Self {
        self.polls.push(PollReply {
            status: "PROCESSING",
            pdf_path: None,
            message: None,
        });
        self
    }

    /// A `SUCCESS` reply whose `pdf_url` points at the stub, unescaped.
    pub fn success(mut self, pdf_path: &str) -> Self {
        self.polls.push(PollReply {
            status: "SUCCESS",
            pdf_path: Some(pdf_path.to_string()),
            message: None,
        });
        self
    }

    pub fn failure(mut self, message: &str) -> Self {
        self.polls.push(PollReply {
            status: "FAILURE",
            pdf_path: None,
            message: Some(message.to_string()),
        });
        self
    }

    /// Binds on an ephemeral port and serves in the background.
    pub async fn start(self) -> Arc<Stub> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let threads = self
            .threads
            .into_iter()
            .map(|(id, title, author)| {
                let envelope = json!({
                    "thread": {
                        "id": id,
                        "title": title,
                        "link": format!("https://quip.com/{}", id),
                        "author_id": author,
                        "type": "document",
                        "updated_usec": UPDATED_USEC,
                    }
                });
                (id, envelope)
            })
            .collect();

        let stub = Arc::new(Stub {
            base_url,
            threads,
            recent: self.recent,
            search: self.search,
            users: self.users.into_iter().collect(),
            request_id: self.request_id,
            polls: Mutex::new(self.polls.into()),
            requests: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            shared_files: Mutex::new(Vec::new()),
            pdf_queries: Mutex::new(Vec::new()),
        });

        let app = stub_router(stub.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        stub
    }
}

// =============================================================================
// Stub state
// =============================================================================

pub struct Stub {
    pub base_url: String,
    threads: HashMap<String, Value>,
    recent: Vec<String>,
    search: Vec<String>,
    users: HashMap<String, String>,
    request_id: Option<String>,
    polls: Mutex<VecDeque<PollReply>>,
    requests: Mutex<Vec<String>>,
    messages: Mutex<Vec<Value>>,
    uploads: Mutex<Vec<Vec<u8>>>,
    shared_files: Mutex<Vec<Value>>,
    pdf_queries: Mutex<Vec<String>>,
}

impl Stub {
    /// Quip requests seen, as `"METHOD /path"`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_requests(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    /// `chat.postMessage` bodies in order.
    pub fn messages(&self) -> Vec<Value> {
        self.messages.lock().unwrap().clone()
    }

    pub fn message_texts(&self) -> Vec<String> {
        self.messages()
            .iter()
            .map(|m| m["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Raw bodies received on the upload URL.
    pub fn uploads(&self) -> Vec<Vec<u8>> {
        self.uploads.lock().unwrap().clone()
    }

    /// `files.completeUploadExternal` bodies.
    pub fn shared_files(&self) -> Vec<Value> {
        self.shared_files.lock().unwrap().clone()
    }

    /// Query strings the PDF was fetched with.
    pub fn pdf_queries(&self) -> Vec<String> {
        self.pdf_queries.lock().unwrap().clone()
    }

    /// Waits until at least `count` messages were posted.
    pub async fn wait_for_messages(&self, count: usize) {
        for _ in 0..200 {
            if self.messages.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} messages, got {:?}",
            count,
            self.message_texts()
        );
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

type StubState = State<Arc<Stub>>;

fn stub_router(stub: Arc<Stub>) -> Router {
    Router::new()
        .route("/1/oauth/verify_token", get(verify_token))
        .route("/1/users/", get(users))
        .route("/1/threads/search", get(search))
        .route("/1/threads/recent", get(recent))
        .route("/1/threads/:id", get(thread))
        .route(
            "/1/threads/:id/export/pdf/async",
            post(create_export).get(poll_export),
        )
        .route("/blob/:id", get(blob))
        .route("/api/chat.postMessage", post(post_message))
        .route("/api/files.getUploadURLExternal", post(upload_url))
        .route("/upload/:file_id", post(receive_upload))
        .route("/api/files.completeUploadExternal", post(complete_upload))
        .with_state(stub)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", QUIP_TOKEN).as_str())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid token"}))).into_response()
}

// =============================================================================
// Quip handlers
// =============================================================================

async fn verify_token(State(stub): StubState, headers: HeaderMap) -> Response {
    stub.record("GET /1/oauth/verify_token".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"user_id": "UAAAAAAAAAA"})).into_response()
}

async fn users(
    State(stub): StubState,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let ids = query.get("ids").cloned().unwrap_or_default();
    stub.record(format!("GET /1/users/?ids={}", ids));
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut found = Map::new();
    for id in ids.split(',') {
        if let Some(name) = stub.users.get(id) {
            found.insert(id.to_string(), json!({"id": id, "name": name}));
        }
    }
    Json(Value::Object(found)).into_response()
}

async fn search(
    State(stub): StubState,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    stub.record(format!(
        "GET /1/threads/search?query={}",
        query.get("query").cloned().unwrap_or_default()
    ));
    if !authorized(&headers) {
        return unauthorized();
    }

    let hits: Vec<Value> = stub
        .search
        .iter()
        .filter_map(|id| stub.threads.get(id).cloned())
        .collect();
    Json(Value::Array(hits)).into_response()
}

async fn recent(State(stub): StubState, headers: HeaderMap) -> Response {
    stub.record("GET /1/threads/recent".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut entries = Map::new();
    for id in &stub.recent {
        if let Some(envelope) = stub.threads.get(id) {
            entries.insert(id.clone(), envelope.clone());
        }
    }
    Json(Value::Object(entries)).into_response()
}

async fn thread(State(stub): StubState, headers: HeaderMap, UrlPath(id): UrlPath<String>) -> Response {
    stub.record(format!("GET /1/threads/{}", id));
    if !authorized(&headers) {
        return unauthorized();
    }

    match stub.threads.get(&id) {
        Some(envelope) => Json(envelope.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

async fn create_export(
    State(stub): StubState,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Response {
    stub.record(format!("POST /1/threads/{}/export/pdf/async", id));
    if !authorized(&headers) {
        return unauthorized();
    }

    match &stub.request_id {
        Some(request_id) => Json(json!({"request_id": request_id})).into_response(),
        None => Json(json!({"error": "export unavailable"})).into_response(),
    }
}

async fn poll_export(
    State(stub): StubState,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Response {
    stub.record(format!("GET /1/threads/{}/export/pdf/async", id));
    if !authorized(&headers) {
        return unauthorized();
    }

    let reply = stub.polls.lock().unwrap().pop_front();
    let body = match reply {
        Some(reply) => {
            let mut body = json!({"status": reply.status});
            if let Some(path) = reply.pdf_path {
                body["pdf_url"] = json!(format!("{}{}", stub.base_url, path));
            }
            if let Some(message) = reply.message {
                body["message"] = json!(message);
            }
            body
        }
        None => json!({"status": "PROCESSING"}),
    };
    Json(body).into_response()
}

async fn blob(
    State(stub): StubState,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    stub.pdf_queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    if !authorized(&headers) {
        return unauthorized();
    }
    ([(header::CONTENT_TYPE, "application/pdf")], PDF_BYTES).into_response()
}

// =============================================================================
// Slack handlers
// =============================================================================

async fn post_message(State(stub): StubState, Json(body): Json<Value>) -> Json<Value> {
    stub.messages.lock().unwrap().push(body);
    Json(json!({"ok": true, "ts": "1700000000.000100"}))
}

async fn upload_url(
    State(stub): StubState,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    let file_id = format!("F{:04}", stub.uploads.lock().unwrap().len() + 1);
    Json(json!({
        "ok": true,
        "upload_url": format!("{}/upload/{}", stub.base_url, file_id),
        "file_id": file_id,
        "filename": form.get("filename"),
    }))
}

async fn receive_upload(State(stub): StubState, body: Bytes) -> StatusCode {
    stub.uploads.lock().unwrap().push(body.to_vec());
    StatusCode::OK
}

async fn complete_upload(State(stub): StubState, Json(body): Json<Value>) -> Json<Value> {
    stub.shared_files.lock().unwrap().push(body);
    Json(json!({"ok": true}))
}

// =============================================================================
// Bot wiring
// =============================================================================

/// Sleeper that returns immediately.
pub struct InstantSleeper;

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

pub fn token() -> AccessToken {
    AccessToken::new(QUIP_TOKEN).unwrap()
}

pub fn channel() -> ChannelId {
    ChannelId::new(CHANNEL).unwrap()
}

pub fn settings(delivery: ArtifactDelivery) -> ExportSettings {
    ExportSettings {
        schedule: PollSchedule::new(Duration::from_secs(3), 5),
        delivery,
    }
}

/// Interaction router wired with the real adapters against the stub.
pub fn bot(
    stub: &Stub,
    context: BotContext,
    settings: ExportSettings,
    scratch_dir: &Path,
) -> InteractionRouter {
    let platform = Arc::new(QuipDocumentAdapter::new(QuipConfig::new(&stub.base_url)).unwrap());
    let chat = Arc::new(SlackChatAdapter::new(
        SlackConfig::new(SecretString::new("xoxb-test".to_string()))
            .with_base_url(format!("{}/api", stub.base_url)),
    )
    .unwrap());
    let job = ExportJob::new(
        platform.clone(),
        chat.clone(),
        Arc::new(LocalScratchStorage::new(scratch_dir)),
        Arc::new(InstantSleeper),
        settings,
    );
    InteractionRouter::new(Arc::new(context), platform, chat, job)
}

/// Files left in a directory.
pub fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

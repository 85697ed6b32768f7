//! ExportJob - submits a PDF export, polls it to a terminal state and
//! delivers the result into the chat.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{BotContext, ResultRenderer};
use crate::domain::document::DocumentRef;
use crate::domain::export::{
    correct_pdf_url, ArtifactDelivery, ArtifactResult, ExportOutcome, ExportRequest, ExportStatus,
    PdfLocation,
};
use crate::domain::foundation::{AccessToken, ChannelId, RequestId, StateMachine};
use crate::domain::message::ChatMessage;
use crate::ports::{ChatPlatform, DocumentPlatform, FileUpload, ScratchStorage, Sleeper};

/// Fixed-interval polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSchedule {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Total time spent sleeping when the job never finishes.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), 60)
    }
}

/// Tunables of an export job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSettings {
    pub schedule: PollSchedule,
    pub delivery: ArtifactDelivery,
}

/// Runs exports of single documents.
pub struct ExportJob {
    platform: Arc<dyn DocumentPlatform>,
    chat: Arc<dyn ChatPlatform>,
    scratch: Arc<dyn ScratchStorage>,
    sleeper: Arc<dyn Sleeper>,
    settings: ExportSettings,
}

impl ExportJob {
    pub fn new(
        platform: Arc<dyn DocumentPlatform>,
        chat: Arc<dyn ChatPlatform>,
        scratch: Arc<dyn ScratchStorage>,
        sleeper: Arc<dyn Sleeper>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            platform,
            chat,
            scratch,
            sleeper,
            settings,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Exports `document` and reports every step into `channel`.
    ///
    /// Never fails: each problem ends the job with a user-visible message and
    /// a matching outcome.
    pub async fn run(
        &self,
        context: &BotContext,
        token: &AccessToken,
        document: &DocumentRef,
        channel: &ChannelId,
    ) -> ExportOutcome {
        let Some(_guard) = context.in_flight().try_acquire(&document.id) else {
            tracing::info!(thread_id = %document.id, "Export already in progress");
            self.notify(channel, ResultRenderer::render_already_in_progress(document))
                .await;
            return ExportOutcome::AlreadyInProgress {
                thread_id: document.id.clone(),
            };
        };

        let request_id = match self.submit(token, document).await {
            Ok(request_id) => request_id,
            Err(reason) => {
                tracing::warn!(thread_id = %document.id, %reason, "PDF export submission failed");
                self.notify(
                    channel,
                    ResultRenderer::render_submission_failed(document, &reason),
                )
                .await;
                return ExportOutcome::SubmissionFailed {
                    thread_id: document.id.clone(),
                    reason,
                };
            }
        };

        self.notify(
            channel,
            ResultRenderer::render_export_started(document, &request_id),
        )
        .await;

        let request = self
            .poll_until_terminal(token, ExportRequest::new(request_id, document.id.clone()))
            .await;

        match request.status() {
            status if status.has_artifact() => {
                let artifact = self.deliver(token, document, &request, channel).await;
                ExportOutcome::Completed { request, artifact }
            }
            ExportStatus::Failure => {
                let message = request.message().unwrap_or("no reason given").to_string();
                self.notify(channel, ResultRenderer::render_export_failed(&message))
                    .await;
                ExportOutcome::Failed { request, message }
            }
            _ => {
                self.notify(
                    channel,
                    ResultRenderer::render_timed_out(document, self.settings.schedule.budget()),
                )
                .await;
                ExportOutcome::TimedOut { request }
            }
        }
    }

    async fn submit(&self, token: &AccessToken, document: &DocumentRef) -> Result<RequestId, String> {
        match self.platform.create_pdf_export(token, &document.id).await {
            Ok(Some(request_id)) => {
                tracing::info!(thread_id = %document.id, %request_id, "PDF export submitted");
                Ok(request_id)
            }
            Ok(None) => Err("no request id in the response".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Sleeps, then polls, until the platform reports a terminal status or
    /// the attempt budget is spent.
    async fn poll_until_terminal(
        &self,
        token: &AccessToken,
        mut request: ExportRequest,
    ) -> ExportRequest {
        let schedule = self.settings.schedule;

        for attempt in 1..=schedule.max_attempts {
            self.sleeper.sleep(schedule.interval).await;

            let poll = match self
                .platform
                .poll_pdf_export(token, request.thread_id(), request.request_id())
                .await
            {
                Ok(poll) => poll,
                Err(e) => {
                    tracing::warn!(
                        request_id = %request.request_id(),
                        attempt,
                        error = %e,
                        "Polling PDF export failed"
                    );
                    if let Err(error) = request.fail(e.to_string()) {
                        tracing::error!(%error, "Could not record polling failure");
                    }
                    return request;
                }
            };

            match request.record_poll(poll) {
                Ok(status) => {
                    tracing::debug!(
                        request_id = %request.request_id(),
                        attempt,
                        ?status,
                        "Polled PDF export"
                    );
                    if status.is_terminal() {
                        return request;
                    }
                }
                Err(error) => {
                    tracing::warn!(request_id = %request.request_id(), attempt, %error, "Ignoring status report");
                }
            }
        }

        tracing::warn!(
            request_id = %request.request_id(),
            attempts = schedule.max_attempts,
            "PDF export timed out"
        );
        if let Err(error) = request.time_out() {
            tracing::error!(%error, "Could not record timeout");
        }
        request
    }

    async fn deliver(
        &self,
        token: &AccessToken,
        document: &DocumentRef,
        request: &ExportRequest,
        channel: &ChannelId,
    ) -> ArtifactResult {
        let note = match request.status() {
            ExportStatus::PartialSuccess => request.message(),
            _ => None,
        };

        let location = match request
            .result_url()
            .ok_or_else(|| "export finished without a PDF URL".to_string())
            .and_then(|raw| {
                correct_pdf_url(raw, &document.fallback_pdf_name()).map_err(|e| e.to_string())
            }) {
            Ok(location) => location,
            Err(error) => {
                self.notify(channel, ResultRenderer::render_export_failed(&error))
                    .await;
                return ArtifactResult::DeliveryFailed { error };
            }
        };

        match self.settings.delivery {
            ArtifactDelivery::Link => {
                self.notify(channel, ResultRenderer::render_download(&location, note))
                    .await;
                ArtifactResult::Linked {
                    url: location.url.to_string(),
                }
            }
            ArtifactDelivery::Upload => {
                match self.upload(token, request.request_id(), &location, channel).await {
                    Ok(()) => {
                        if let Some(note) = note {
                            self.notify(channel, ResultRenderer::render_partial_note(note))
                                .await;
                        }
                        ArtifactResult::Uploaded {
                            filename: location.filename,
                        }
                    }
                    Err(error) => {
                        tracing::warn!(request_id = %request.request_id(), %error, "PDF upload failed");
                        self.notify(channel, ResultRenderer::render_upload_failed(&error))
                            .await;
                        ArtifactResult::DeliveryFailed { error }
                    }
                }
            }
        }
    }

    /// Fetches the PDF into a scratch file and uploads it.
    ///
    /// The scratch file is removed whether or not the upload succeeds.
    async fn upload(
        &self,
        token: &AccessToken,
        request_id: &RequestId,
        location: &PdfLocation,
        channel: &ChannelId,
    ) -> Result<(), String> {
        let bytes = self
            .platform
            .fetch_pdf(token, &location.url)
            .await
            .map_err(|e| e.to_string())?;

        let path = self
            .scratch
            .write(request_id, &bytes)
            .await
            .map_err(|e| e.to_string())?;
        let scratch_file = ScratchFile::new(self.scratch.clone(), path.clone());

        let uploaded = self
            .chat
            .upload_file(
                channel,
                &FileUpload {
                    path,
                    filename: location.filename.clone(),
                    title: location.filename.clone(),
                },
            )
            .await
            .map_err(|e| e.to_string());

        scratch_file.release().await;
        if uploaded.is_ok() {
            tracing::info!(%request_id, filename = %location.filename, "PDF uploaded");
        }
        uploaded
    }

    async fn notify(&self, channel: &ChannelId, message: ChatMessage) {
        if let Err(error) = self.chat.post_message(channel, &message).await {
            tracing::warn!(%channel, %error, "Failed to post message");
        }
    }
}

/// A scratch file owned by one export.
///
/// `release` removes it; if the owner is dropped first (panic or task
/// abort), removal is scheduled on the runtime instead.
struct ScratchFile {
    storage: Arc<dyn ScratchStorage>,
    path: Option<PathBuf>,
}

impl ScratchFile {
    fn new(storage: Arc<dyn ScratchStorage>, path: PathBuf) -> Self {
        Self {
            storage,
            path: Some(path),
        }
    }

    async fn release(mut self) {
        if let Some(path) = self.path.take() {
            if let Err(error) = self.storage.remove(&path).await {
                tracing::warn!(path = %path.display(), %error, "Failed to remove scratch file");
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        let storage = self.storage.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(error) = storage.remove(&path).await {
                    tracing::warn!(path = %path.display(), %error, "Failed to remove scratch file");
                }
            });
        }
    }
}

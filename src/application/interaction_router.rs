//! InteractionRouter - dispatches slash commands and button clicks.
//!
//! Every entry point checks for a verified Quip token before any other
//! remote call. Without one, a command argument is taken to be a token and
//! verified instead.

use std::sync::Arc;
use thiserror::Error;

use super::{BotContext, DocumentResolver, ExportJob, ResultRenderer, Resolution};
use crate::domain::document::DocumentRef;
use crate::domain::export::ExportOutcome;
use crate::domain::foundation::{AccessToken, ChannelId};
use crate::domain::message::ChatMessage;
use crate::ports::{ChatPlatform, DocumentPlatform, DocumentPlatformError};

pub const TOKEN_VERIFIED_TEXT: &str = "Verified the access token successfully.";
pub const TOKEN_INVALID_TEXT: &str = "The access token is invalid.";
pub const TOKEN_MISSING_TEXT: &str =
    "Please specify your Quip access token. You can get it from https://quip.com/dev/token.";
pub const RECENT_HEADER: &str = "Recent Documents";

/// An inbound user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Slash command with its optional text.
    Command {
        argument: Option<String>,
        channel: ChannelId,
    },
    /// Click on a rendered export button.
    ButtonClick { thread_id: String, channel: ChannelId },
}

impl Interaction {
    pub fn channel(&self) -> &ChannelId {
        match self {
            Interaction::Command { channel, .. } | Interaction::ButtonClick { channel, .. } => {
                channel
            }
        }
    }
}

/// What the router did with an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    TokenMissing,
    TokenVerified,
    TokenRejected,
    /// A list of documents was rendered.
    Listed { header: String, count: usize },
    /// The clicked thread no longer resolves.
    NotFound { thread_id: String },
    Exported(ExportOutcome),
    /// Quip could not be reached or answered with an error.
    PlatformUnavailable { error: String },
}

/// Errors that end an interaction early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error(transparent)]
    Platform(#[from] DocumentPlatformError),
}

/// Routes interactions to the resolver, renderer and export job.
pub struct InteractionRouter {
    context: Arc<BotContext>,
    platform: Arc<dyn DocumentPlatform>,
    chat: Arc<dyn ChatPlatform>,
    resolver: DocumentResolver,
    renderer: ResultRenderer,
    export_job: ExportJob,
}

impl InteractionRouter {
    pub fn new(
        context: Arc<BotContext>,
        platform: Arc<dyn DocumentPlatform>,
        chat: Arc<dyn ChatPlatform>,
        export_job: ExportJob,
    ) -> Self {
        Self {
            context,
            resolver: DocumentResolver::new(platform.clone()),
            renderer: ResultRenderer::new(platform.clone()),
            platform,
            chat,
            export_job,
        }
    }

    pub fn context(&self) -> &BotContext {
        &self.context
    }

    /// Handles one interaction start to finish, including any export.
    pub async fn handle(&self, interaction: Interaction) -> RouteOutcome {
        let channel = interaction.channel().clone();
        let result = match interaction {
            Interaction::Command { argument, channel } => {
                self.handle_command(argument.as_deref(), &channel).await
            }
            Interaction::ButtonClick { thread_id, channel } => {
                self.handle_button_click(&thread_id, &channel).await
            }
        };

        match result {
            Ok(outcome) => outcome,
            Err(InteractionError::Platform(error)) => {
                tracing::warn!(%channel, %error, "Quip request failed");
                self.say(&channel, ResultRenderer::render_platform_error(&error))
                    .await;
                RouteOutcome::PlatformUnavailable {
                    error: error.to_string(),
                }
            }
        }
    }

    /// Slash command: recent listing, direct export, or search results.
    pub async fn handle_command(
        &self,
        argument: Option<&str>,
        channel: &ChannelId,
    ) -> Result<RouteOutcome, InteractionError> {
        let Some(token) = self.context.credential().current().await else {
            return self.bootstrap_token(argument, channel).await;
        };

        match self.resolver.resolve(&token, argument).await? {
            Resolution::Recent(documents) => {
                self.list(&token, RECENT_HEADER, &documents, channel).await
            }
            Resolution::ById(document) => self.export(&token, &document, channel).await,
            Resolution::Search { query, results } => {
                if let [document] = results.as_slice() {
                    return self.export(&token, document, channel).await;
                }
                let header = format!("Search Results - {}", query);
                self.list(&token, &header, &results, channel).await
            }
        }
    }

    /// Button click: re-fetch the thread and export it.
    pub async fn handle_button_click(
        &self,
        thread_id: &str,
        channel: &ChannelId,
    ) -> Result<RouteOutcome, InteractionError> {
        let Some(token) = self.context.credential().current().await else {
            self.say(channel, ChatMessage::text(TOKEN_MISSING_TEXT)).await;
            return Ok(RouteOutcome::TokenMissing);
        };

        match self.resolver.by_id(&token, thread_id).await? {
            Some(document) => self.export(&token, &document, channel).await,
            None => {
                tracing::info!(thread_id, "Clicked thread no longer resolves");
                self.say(channel, ResultRenderer::render_thread_not_found(thread_id))
                    .await;
                Ok(RouteOutcome::NotFound {
                    thread_id: thread_id.to_string(),
                })
            }
        }
    }

    async fn bootstrap_token(
        &self,
        argument: Option<&str>,
        channel: &ChannelId,
    ) -> Result<RouteOutcome, InteractionError> {
        let candidate = argument.and_then(|raw| AccessToken::new(raw).ok());
        let Some(candidate) = candidate else {
            self.say(channel, ChatMessage::text(TOKEN_MISSING_TEXT)).await;
            return Ok(RouteOutcome::TokenMissing);
        };

        let verified = self
            .context
            .credential()
            .verify_and_store(self.platform.as_ref(), candidate)
            .await?;

        if verified {
            self.say(channel, ChatMessage::text(TOKEN_VERIFIED_TEXT)).await;
            Ok(RouteOutcome::TokenVerified)
        } else {
            self.say(channel, ChatMessage::text(TOKEN_INVALID_TEXT)).await;
            Ok(RouteOutcome::TokenRejected)
        }
    }

    async fn list(
        &self,
        token: &AccessToken,
        header: &str,
        documents: &[DocumentRef],
        channel: &ChannelId,
    ) -> Result<RouteOutcome, InteractionError> {
        let message = self
            .renderer
            .render_list(self.context.names(), token, header, documents)
            .await?;
        self.say(channel, message).await;

        Ok(RouteOutcome::Listed {
            header: header.to_string(),
            count: documents.iter().filter(|d| d.is_document()).count(),
        })
    }

    async fn export(
        &self,
        token: &AccessToken,
        document: &DocumentRef,
        channel: &ChannelId,
    ) -> Result<RouteOutcome, InteractionError> {
        let outcome = self
            .export_job
            .run(&self.context, token, document, channel)
            .await;
        Ok(RouteOutcome::Exported(outcome))
    }

    async fn say(&self, channel: &ChannelId, message: ChatMessage) {
        if let Err(error) = self.chat.post_message(channel, &message).await {
            tracing::warn!(%channel, %error, "Failed to post message");
        }
    }
}

//! Quip PDF Bot server binary.
//!
//! Loads configuration, wires the Quip and Slack adapters into the
//! interaction router and serves the Slack endpoints.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use quip_pdf_bot::adapters::http::{slack_router, SlackAppState};
use quip_pdf_bot::adapters::{
    LocalScratchStorage, QuipDocumentAdapter, SlackChatAdapter, SlackSignatureVerifier,
    TokioSleeper,
};
use quip_pdf_bot::application::{BotContext, ExportJob, InteractionRouter};
use quip_pdf_bot::config::{AppConfig, ServerConfig};
use quip_pdf_bot::domain::foundation::AccessToken;
use quip_pdf_bot::{adapters, ports::DocumentPlatform};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    setup_tracing(&config.server);
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        delivery = ?config.export.delivery,
        "starting quip-pdf-bot"
    );

    // Adapters
    let platform: Arc<dyn DocumentPlatform> = Arc::new(QuipDocumentAdapter::new(
        adapters::QuipConfig::new(&config.quip.base_url)
            .with_request_timeout(config.quip.request_timeout()),
    )?);
    let chat = Arc::new(SlackChatAdapter::new(
        adapters::SlackConfig::new(config.slack.bot_token.clone())
            .with_base_url(&config.slack.api_base_url)
            .with_request_timeout(config.slack.request_timeout()),
    )?);
    let scratch = Arc::new(LocalScratchStorage::new(config.export.scratch_dir()));

    // Shared bot state
    let context = Arc::new(BotContext::new());
    if let Some(raw) = config.quip.access_token() {
        let token = AccessToken::new(raw)?;
        match context.credential().verify_and_store(platform.as_ref(), token).await {
            Ok(true) => info!("configured Quip access token verified"),
            Ok(false) => tracing::warn!("configured Quip access token rejected"),
            Err(e) => tracing::warn!(error = %e, "could not verify configured Quip access token"),
        }
    }

    let export_job = ExportJob::new(
        platform.clone(),
        chat.clone(),
        scratch,
        Arc::new(TokioSleeper),
        config.export.settings(),
    );
    let router = InteractionRouter::new(context, platform, chat, export_job);

    let state = SlackAppState::new(
        Arc::new(router),
        SlackSignatureVerifier::new(config.slack.signing_secret.clone()),
    );
    let app = slack_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            ))),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

fn setup_tracing(server: &ServerConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.json_logs() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `askai serve` command implementation.
//!
//! Builds every adapter from configuration, wires them into the pipeline,
//! and serves the router until SIGINT or SIGTERM. The database is
//! checkpointed after the listener drains.

use std::sync::Arc;
use std::time::Duration;

use askai_artifacts::S3ArtifactStore;
use askai_auth::{GoogleTokenVerifier, RecaptchaGate};
use askai_config::model::{AskaiConfig, HttpConfig};
use askai_core::types::HealthStatus;
use askai_core::{AskaiError, PluginAdapter};
use askai_gateway::{AppState, build_router};
use askai_openai::OpenAiConnector;
use askai_pipeline::{GenerationPipeline, LoginVerifier};
use askai_storage::SqliteStorage;
use axum::Router;
use tracing::{debug, info, warn};

/// A wired application: the router plus the store that must be closed.
pub struct App {
    pub router: Router,
    pub storage: Arc<SqliteStorage>,
}

/// Builds adapters, opens the database and assembles the router.
pub async fn build_app(config: &AskaiConfig) -> Result<App, AskaiError> {
    let http = build_http_client(&config.http)?;

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let verifier = Arc::new(GoogleTokenVerifier::new(&config.identity, http.clone()));
    let bot_check = Arc::new(RecaptchaGate::new(&config.bot_check, http.clone()));
    let artifacts = Arc::new(S3ArtifactStore::new(&config.artifacts, http)?);
    let connector = Arc::new(OpenAiConnector::new(
        &config.provider,
        &config.policy,
        &config.video,
    )?);

    let adapters: [&dyn PluginAdapter; 4] = [
        verifier.as_ref(),
        bot_check.as_ref(),
        artifacts.as_ref(),
        storage.as_ref(),
    ];
    report_health(&adapters).await;

    let pipeline = GenerationPipeline::new(
        verifier.clone(),
        connector,
        artifacts,
        storage.clone(),
    );
    let login = Arc::new(LoginVerifier::new(bot_check, verifier));

    let router = build_router(AppState { pipeline, login }, &config.server)?;
    Ok(App { router, storage })
}

/// Shared client for identity, reCAPTCHA and object store calls.
fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, AskaiError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .map_err(|e| AskaiError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Logs adapters that start in a degraded state. Startup continues either way.
async fn report_health(adapters: &[&dyn PluginAdapter]) {
    for adapter in adapters {
        match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => {
                debug!(adapter = adapter.name(), kind = %adapter.adapter_type(), "healthy");
            }
            Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => {
                warn!(adapter = adapter.name(), kind = %adapter.adapter_type(), %reason, "adapter not ready");
            }
            Err(e) => {
                warn!(adapter = adapter.name(), error = %e, "health check failed");
            }
        }
    }
}

/// Runs the `askai serve` command.
pub async fn run_serve(config: AskaiConfig) -> Result<(), AskaiError> {
    init_tracing(&config.server.log_level);
    info!("starting askai serve");

    let app = build_app(&config).await?;
    let served = askai_gateway::serve(&config.server, app.router, shutdown_signal()).await;

    if let Err(e) = app.storage.close().await {
        warn!(error = %e, "database checkpoint on shutdown failed");
    }
    served?;
    info!("askai serve shutdown complete");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("askai={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

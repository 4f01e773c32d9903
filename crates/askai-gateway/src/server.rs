// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the HTTP listener.

use std::future::Future;
use std::sync::Arc;

use askai_config::model::ServerConfig;
use askai_core::AskaiError;
use askai_pipeline::{GenerationPipeline, LoginVerifier};
use axum::{
    Router,
    http::{
        HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    },
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: GenerationPipeline,
    pub login: Arc<LoginVerifier>,
}

/// CORS for exactly one origin with credentials.
///
/// Credentialed CORS forbids `*`, so methods and headers mirror the
/// preflight and exposed headers are listed. Requests from any other origin
/// get no `access-control-allow-origin` header at all.
pub fn build_cors_layer(allowed_origin: &str) -> Result<CorsLayer, AskaiError> {
    let origin = HeaderValue::from_str(allowed_origin).map_err(|e| {
        AskaiError::Config(format!(
            "allowed origin `{allowed_origin}` is not a valid header value: {e}"
        ))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([CONTENT_TYPE, CONTENT_LENGTH, CONTENT_DISPOSITION]))
}

/// Builds the full application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router, AskaiError> {
    let cors = build_cors_layer(&config.allowed_origin)?;

    Ok(Router::new()
        .route("/", get(handlers::get_health))
        .route("/verify-login", post(handlers::post_verify_login))
        .route("/chats/", post(handlers::post_chat).get(handlers::get_chats))
        .route(
            "/images/",
            post(handlers::post_image).get(handlers::get_images),
        )
        .route(
            "/videos/",
            post(handlers::post_video).get(handlers::get_videos),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Binds `host:port` and serves `app` until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, app: Router, shutdown: F) -> Result<(), AskaiError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AskaiError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("askai listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AskaiError::Internal(format!("server error: {e}")))
}

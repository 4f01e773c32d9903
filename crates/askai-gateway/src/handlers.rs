// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Each handler pulls the `Authorization` header and the parsed body or
//! query, hands them to the pipeline, and serializes the result.

use askai_core::types::{DateRange, ImageExchange, TextExchange, VideoExchange};
use askai_pipeline::{ChatRequest, ImageRequest, LoginRequest, LoginResponse, VideoRequest};
use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery, authorization};
use crate::server::AppState;

/// Response body for `GET /`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub endpoint: String,
}

/// GET /
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "The backend is running".to_string(),
        endpoint: "/chats/".to_string(),
    })
}

/// POST /verify-login
pub async fn post_verify_login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(state.login.verify(body).await?))
}

/// POST /chats/
pub async fn post_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<ChatRequest>,
) -> Result<Json<TextExchange>, ApiError> {
    let record = state
        .pipeline
        .create_text(authorization(&headers), body)
        .await?;
    Ok(Json(record))
}

/// POST /images/
pub async fn post_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<ImageRequest>,
) -> Result<Json<ImageExchange>, ApiError> {
    let record = state
        .pipeline
        .create_image(authorization(&headers), body)
        .await?;
    Ok(Json(record))
}

/// POST /videos/
pub async fn post_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<VideoRequest>,
) -> Result<Json<VideoExchange>, ApiError> {
    let record = state
        .pipeline
        .create_video(authorization(&headers), body)
        .await?;
    Ok(Json(record))
}

/// GET /chats/
pub async fn get_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<TextExchange>>, ApiError> {
    Ok(Json(
        state.pipeline.list_text(authorization(&headers), range).await?,
    ))
}

/// GET /images/
pub async fn get_images(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<ImageExchange>>, ApiError> {
    Ok(Json(
        state
            .pipeline
            .list_images(authorization(&headers), range)
            .await?,
    ))
}

/// GET /videos/
pub async fn get_videos(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<Vec<VideoExchange>>, ApiError> {
    Ok(Json(
        state
            .pipeline
            .list_videos(authorization(&headers), range)
            .await?,
    ))
}

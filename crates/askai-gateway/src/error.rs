// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from pipeline errors to HTTP responses.
//!
//! Clients only ever see a fixed message per error kind. The full error,
//! source chain included, goes to the log.

use askai_core::{AskaiError, ErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body of every error response: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// An error ready to be rendered as a response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// A request body or query string the framework could not parse.
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::BotCheckFailed => StatusCode::BAD_REQUEST,
        ErrorKind::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::GenerationFailed | ErrorKind::StorageFailed | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn public_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Unauthenticated => "Login required",
        ErrorKind::Forbidden => "Emails do not match",
        ErrorKind::BotCheckFailed => "reCAPTCHA verification failed",
        ErrorKind::GenerationFailed => "Error while generating the AI response",
        ErrorKind::StorageFailed => "Error while storing the generated file",
        ErrorKind::ValidationError => "Invalid request",
        ErrorKind::Internal => "Internal server error",
    }
}

fn source_chain(err: &AskaiError) -> String {
    let mut chain = String::new();
    let mut current = std::error::Error::source(err);
    while let Some(cause) = current {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        current = cause.source();
    }
    chain
}

impl From<AskaiError> for ApiError {
    fn from(err: AskaiError) -> Self {
        let kind = err.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            tracing::error!(kind = %kind, error = %err, cause = %source_chain(&err), "request failed");
        } else {
            tracing::debug!(kind = %kind, error = %err, "request rejected");
        }
        Self::new(status, public_message(kind))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

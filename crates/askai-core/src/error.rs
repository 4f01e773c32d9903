// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the askai backend.

use strum::{Display, EnumString};
use thiserror::Error;

/// The primary error type used across all askai adapter traits and the pipeline.
#[derive(Debug, Error)]
pub enum AskaiError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or invalid bearer credential.
    #[error("unauthenticated: {message}")]
    Unauthenticated { message: String },

    /// The verified principal does not own the submitted resource.
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// The bot-check service rejected the challenge token or was unreachable.
    #[error("bot check failed")]
    BotCheckFailed,

    /// Malformed request body or query string.
    #[error("validation error: {0}")]
    Validation(String),

    /// Generation provider errors (API failure, failed job, undecodable payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Object store errors (signing, transport, non-success upload).
    #[error("artifact store error: {message}")]
    Artifact {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Record store errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Client-facing failure classes.
///
/// Every [`AskaiError`] maps onto exactly one kind; the HTTP layer picks the
/// status code and the public message from the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    BotCheckFailed,
    GenerationFailed,
    StorageFailed,
    ValidationError,
    Internal,
}

impl AskaiError {
    /// Shorthand for an [`AskaiError::Unauthenticated`] with a diagnostic message.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Shorthand for a sourceless [`AskaiError::Provider`].
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a sourceless [`AskaiError::Artifact`].
    pub fn artifact(message: impl Into<String>) -> Self {
        Self::Artifact {
            message: message.into(),
            source: None,
        }
    }

    /// Classifies this error for the public error mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::BotCheckFailed => ErrorKind::BotCheckFailed,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Provider { .. } | Self::Timeout { .. } => ErrorKind::GenerationFailed,
            Self::Artifact { .. } => ErrorKind::StorageFailed,
            Self::Config(_) | Self::Storage { .. } | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the askai backend.
//!
//! Holds the error taxonomy, the persisted record types, and one trait per
//! external system (identity provider, bot check, generation provider,
//! object store, record store). Every other crate in the workspace either
//! implements these traits or composes them.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AskaiError, ErrorKind};
pub use types::{
    AdapterType, DateRange, ExchangeKind, GeneratedVideo, HealthStatus, ImageExchange,
    NewExchange, Principal, TextExchange, VideoExchange, is_valid_job_id,
};

pub use traits::{
    ArtifactStore, BotCheck, GenerationProvider, PluginAdapter, ProviderConnector, RecordStore,
    TokenVerifier, bearer_token,
};

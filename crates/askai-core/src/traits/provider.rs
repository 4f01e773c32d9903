// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation provider traits (text, image, video).

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::AskaiError;
use crate::types::GeneratedVideo;

/// One caller's view of a generation provider.
///
/// Instances are request-scoped: they carry the caller-supplied credential
/// and are dropped when the request finishes.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Two-message chat completion; sampling follows the model policy.
    async fn complete(&self, model_id: &str, prompt: &str) -> Result<String, AskaiError>;

    /// Image synthesis; returns the raw image bytes whatever the response shape.
    async fn synthesize_image(&self, model_id: &str, prompt: &str) -> Result<Vec<u8>, AskaiError>;

    /// Video synthesis; blocks until the provider job is terminal or the
    /// polling deadline expires.
    async fn synthesize_video(
        &self,
        model_id: &str,
        prompt: &str,
        duration_secs: u32,
    ) -> Result<GeneratedVideo, AskaiError>;
}

/// Builds request-scoped [`GenerationProvider`]s from caller credentials.
pub trait ProviderConnector: Send + Sync {
    fn connect(&self, api_key: SecretString) -> Result<Box<dyn GenerationProvider>, AskaiError>;
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for the askai backend.
//!
//! [`OpenAiConnector`] is built once at startup and hands out a request-scoped
//! [`OpenAiClient`] per caller key. Chat sampling and image decoding follow
//! the [`ModelPolicyTable`]; video generation runs the polling state machine
//! in [`video`].

pub mod client;
pub mod policy;
pub mod types;
pub mod video;

use std::sync::Arc;
use std::time::Duration;

use askai_config::model::{PolicyConfig, ProviderConfig, VideoConfig};
use askai_core::{AskaiError, GenerationProvider, ProviderConnector};
use secrecy::SecretString;

pub use client::{OpenAiClient, SYSTEM_PROMPT};
pub use policy::{ImageDelivery, ModelPolicyTable, Sampling};
pub use video::{PollPolicy, VideoJobState};

use client::ClientSettings;

/// Builds [`OpenAiClient`]s that share one connection pool.
pub struct OpenAiConnector {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl OpenAiConnector {
    pub fn new(
        provider: &ProviderConfig,
        policy: &PolicyConfig,
        video: &VideoConfig,
    ) -> Result<Self, AskaiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(provider.request_timeout_secs))
            .build()
            .map_err(|e| AskaiError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            settings: ClientSettings {
                base_url: provider.base_url.clone(),
                policy: Arc::new(ModelPolicyTable::from_config(policy)),
                poll: PollPolicy::from_config(video),
                video_size: video.size.clone(),
            },
        })
    }
}

impl ProviderConnector for OpenAiConnector {
    fn connect(&self, api_key: SecretString) -> Result<Box<dyn GenerationProvider>, AskaiError> {
        Ok(Box::new(OpenAiClient::new(
            self.http.clone(),
            api_key,
            self.settings.clone(),
        )))
    }
}

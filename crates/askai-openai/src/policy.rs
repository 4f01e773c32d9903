// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-model sampling and image-decoding policy.
//!
//! Lookup is by exact model id. Ids not listed fall back to
//! [`Sampling::Creative`] and [`ImageDelivery::InlineBase64`].

use std::collections::HashSet;

use askai_config::model::PolicyConfig;

/// Sampling mode for chat completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// Deterministic sampling (temperature 0).
    Precise,
    /// Default sampling (temperature 1).
    Creative,
}

impl Sampling {
    pub fn temperature(self) -> f32 {
        match self {
            Self::Precise => 0.0,
            Self::Creative => 1.0,
        }
    }
}

/// How an image model hands back its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDelivery {
    /// A provider-hosted URL that must be fetched.
    RemoteUrl,
    /// An inline base64 payload.
    InlineBase64,
}

#[derive(Debug, Clone, Default)]
pub struct ModelPolicyTable {
    precise_models: HashSet<String>,
    url_image_models: HashSet<String>,
}

impl ModelPolicyTable {
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self {
            precise_models: config.precise_models.iter().cloned().collect(),
            url_image_models: config.url_image_models.iter().cloned().collect(),
        }
    }

    pub fn sampling(&self, model_id: &str) -> Sampling {
        if self.precise_models.contains(model_id) {
            Sampling::Precise
        } else {
            Sampling::Creative
        }
    }

    pub fn image_delivery(&self, model_id: &str) -> ImageDelivery {
        if self.url_image_models.contains(model_id) {
            ImageDelivery::RemoteUrl
        } else {
            ImageDelivery::InlineBase64
        }
    }
}

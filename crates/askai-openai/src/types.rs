// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI REST request/response types for chat, image and video endpoints.

use serde::{Deserialize, Serialize};

// --- Chat completions ---

/// A request to `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

/// One message in a chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// --- Images ---

/// A request to `POST /images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

/// One generated image. Which field is populated depends on the model.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
}

// --- Videos ---

/// A request to `POST /videos`. `seconds` is a string on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct VideoCreateRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub seconds: String,
}

/// A video job as returned by create and retrieve.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoJob {
    pub id: String,
    pub status: VideoStatus,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

// --- Errors ---

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_status_parses_known_and_unknown_values() {
        let job: VideoJob =
            serde_json::from_str(r#"{"id":"video_1","status":"in_progress","progress":40}"#)
                .unwrap();
        assert_eq!(job.status, VideoStatus::InProgress);
        assert_eq!(job.progress, Some(40));

        let job: VideoJob = serde_json::from_str(r#"{"id":"video_1","status":"paused"}"#).unwrap();
        assert_eq!(job.status, VideoStatus::Unknown);
    }

    #[test]
    fn video_create_sends_seconds_as_string() {
        let req = VideoCreateRequest {
            model: "sora-2".into(),
            prompt: "a cat".into(),
            size: "1280x720".into(),
            seconds: "8".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["seconds"], "8");
        assert_eq!(json["size"], "1280x720");
    }
}

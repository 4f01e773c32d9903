// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-scoped OpenAI client carrying one caller's API key.

use std::sync::Arc;

use askai_core::{AskaiError, GeneratedVideo, GenerationProvider};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::policy::{ImageDelivery, ModelPolicyTable};
use crate::types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    ImageGenerationRequest, ImageGenerationResponse, VideoCreateRequest, VideoJob,
};
use crate::video::{PollPolicy, VideoJobApi, run_video_job};

/// Fixed system instruction sent ahead of every chat prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer as short as possible.";

/// Settings shared by every client a connector hands out.
#[derive(Debug, Clone)]
pub(crate) struct ClientSettings {
    pub base_url: String,
    pub policy: Arc<ModelPolicyTable>,
    pub poll: PollPolicy,
    pub video_size: String,
}

/// OpenAI client bound to a single caller's API key.
///
/// The underlying `reqwest::Client` (and its connection pool) is shared; the
/// key is attached per call and never leaves this struct.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: SecretString,
    settings: ClientSettings,
}

impl OpenAiClient {
    pub(crate) fn new(http: reqwest::Client, api_key: SecretString, settings: ClientSettings) -> Self {
        Self {
            http,
            api_key,
            settings,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AskaiError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        parse_response(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, AskaiError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;
        parse_response(response).await
    }

    /// Fetches a provider-hosted image. The URL is pre-signed, so no key is sent.
    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, AskaiError> {
        let response = self.http.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AskaiError::provider(format!(
                "image download returned {status}"
            )));
        }
        read_bytes(response).await
    }
}

#[async_trait]
impl GenerationProvider for OpenAiClient {
    async fn complete(&self, model_id: &str, prompt: &str) -> Result<String, AskaiError> {
        let sampling = self.settings.policy.sampling(model_id);
        debug!(model = model_id, ?sampling, "requesting chat completion");
        let request = ChatCompletionRequest {
            model: model_id.to_string(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: sampling.temperature(),
        };
        let response: ChatCompletionResponse = self.post_json("chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AskaiError::provider("chat completion returned no content"))
    }

    async fn synthesize_image(&self, model_id: &str, prompt: &str) -> Result<Vec<u8>, AskaiError> {
        let delivery = self.settings.policy.image_delivery(model_id);
        debug!(model = model_id, ?delivery, "requesting image generation");
        let request = ImageGenerationRequest {
            model: model_id.to_string(),
            prompt: prompt.to_string(),
            n: 1,
        };
        let response: ImageGenerationResponse =
            self.post_json("images/generations", &request).await?;
        let image = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AskaiError::provider("image generation returned no data"))?;

        match delivery {
            ImageDelivery::RemoteUrl => {
                let url = image
                    .url
                    .ok_or_else(|| AskaiError::provider("image response is missing `url`"))?;
                self.fetch_remote(&url).await
            }
            ImageDelivery::InlineBase64 => {
                let encoded = image
                    .b64_json
                    .ok_or_else(|| AskaiError::provider("image response is missing `b64_json`"))?;
                STANDARD.decode(encoded).map_err(|e| AskaiError::Provider {
                    message: format!("image payload is not valid base64: {e}"),
                    source: Some(Box::new(e)),
                })
            }
        }
    }

    async fn synthesize_video(
        &self,
        model_id: &str,
        prompt: &str,
        duration_secs: u32,
    ) -> Result<GeneratedVideo, AskaiError> {
        let request = VideoCreateRequest {
            model: model_id.to_string(),
            prompt: prompt.to_string(),
            size: self.settings.video_size.clone(),
            seconds: duration_secs.to_string(),
        };
        run_video_job(self, &self.settings.poll, request).await
    }
}

#[async_trait]
impl VideoJobApi for OpenAiClient {
    async fn submit(&self, request: &VideoCreateRequest) -> Result<VideoJob, AskaiError> {
        self.post_json("videos", request).await
    }

    async fn retrieve(&self, job_id: &str) -> Result<VideoJob, AskaiError> {
        self.get_json(&format!("videos/{job_id}")).await
    }

    async fn download(&self, job_id: &str) -> Result<Vec<u8>, AskaiError> {
        let response = self
            .http
            .get(self.url(&format!("videos/{job_id}/content")))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        read_bytes(response).await
    }
}

fn transport_error(e: reqwest::Error) -> AskaiError {
    AskaiError::Provider {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn read_bytes(response: reqwest::Response) -> Result<Vec<u8>, AskaiError> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| AskaiError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })
}

async fn parse_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, AskaiError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| AskaiError::Provider {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    debug!(status = %status, "provider response received");

    if !status.is_success() {
        return Err(api_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| AskaiError::Provider {
        message: format!("failed to parse API response: {e}"),
        source: Some(Box::new(e)),
    })
}

fn api_error(status: reqwest::StatusCode, body: &str) -> AskaiError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "OpenAI API error ({}): {}",
            api_err.error.type_.as_deref().unwrap_or("unknown"),
            api_err.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    };
    AskaiError::provider(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use askai_config::model::PolicyConfig;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(
            reqwest::Client::new(),
            SecretString::from("sk-caller-key".to_string()),
            ClientSettings {
                base_url: format!("{}/v1", server.uri()),
                policy: Arc::new(ModelPolicyTable::from_config(&PolicyConfig::default())),
                poll: PollPolicy {
                    initial: Duration::from_millis(5),
                    max: Duration::from_millis(20),
                    multiplier: 2.0,
                    deadline: Duration::from_secs(10),
                },
                video_size: "1280x720".into(),
            },
        )
    }

    fn chat_reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn precise_model_is_sent_with_zero_temperature() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-caller-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-5.2",
                "temperature": 0.0,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": "2+2?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("4")))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server).complete("gpt-5.2", "2+2?").await.unwrap();
        assert_eq!(answer, "4");
    }

    #[tokio::test]
    async fn other_models_are_sent_with_temperature_one() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o", "temperature": 1.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("Four.")))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client(&server).complete("gpt-4o", "2+2?").await.unwrap(), "Four.");
    }

    #[tokio::test]
    async fn api_error_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}
            })))
            .mount(&server)
            .await;

        let err = client(&server).complete("gpt-4o", "hi").await.unwrap_err();
        assert!(matches!(err, AskaiError::Provider { .. }));
        assert!(err.to_string().contains("Incorrect API key"));
    }

    #[tokio::test]
    async fn empty_choices_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        assert!(client(&server).complete("gpt-4o", "hi").await.is_err());
    }

    #[tokio::test]
    async fn url_model_image_is_fetched_without_credentials() {
        let server = MockServer::start().await;
        let image_url = format!("{}/blob/img-1.png", server.uri());
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_partial_json(serde_json::json!({"model": "dall-e-3", "prompt": "a red fox"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "created": 1,
                "data": [{"url": image_url, "revised_prompt": "a red fox"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blob/img-1.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG-remote".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = client(&server)
            .synthesize_image("dall-e-3", "a red fox")
            .await
            .unwrap();
        assert_eq!(bytes, b"\x89PNG-remote");

        let requests = server.received_requests().await.unwrap();
        let fetch: &Request = requests
            .iter()
            .find(|r| r.url.path() == "/blob/img-1.png")
            .unwrap();
        assert!(!fetch.headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn other_image_models_decode_inline_base64() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "created": 1,
                "data": [{"b64_json": STANDARD.encode(b"\x89PNG-inline")}]
            })))
            .mount(&server)
            .await;

        let bytes = client(&server)
            .synthesize_image("gpt-image-1", "a red fox")
            .await
            .unwrap();
        assert_eq!(bytes, b"\x89PNG-inline");
    }

    #[tokio::test]
    async fn shape_follows_model_not_response() {
        // A URL-only answer for a base64 model is an error, not a fetch.
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"url": format!("{}/blob/x.png", server.uri())}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .synthesize_image("gpt-image-1", "a fox")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("b64_json"));
    }

    #[tokio::test]
    async fn invalid_base64_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"b64_json": "!!not base64!!"}]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .synthesize_image("gpt-image-1", "a fox")
            .await
            .unwrap_err();
        assert!(matches!(err, AskaiError::Provider { .. }));
    }

    #[tokio::test]
    async fn video_job_is_submitted_polled_and_downloaded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/videos"))
            .and(header_exists("authorization"))
            .and(body_partial_json(serde_json::json!({
                "model": "sora-2",
                "prompt": "a cat surfing",
                "size": "1280x720",
                "seconds": "8"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "video_abc", "object": "video", "status": "queued", "progress": 0
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/videos/video_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "video_abc", "object": "video", "status": "completed", "progress": 100
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/videos/video_abc/content"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-data".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let video = client(&server)
            .synthesize_video("sora-2", "a cat surfing", 8)
            .await
            .unwrap();
        assert_eq!(video.job_id, "video_abc");
        assert_eq!(video.bytes, b"mp4-data");
    }

    #[tokio::test]
    async fn failed_video_job_never_downloads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "video_bad", "status": "queued"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/videos/video_bad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "video_bad",
                "status": "failed",
                "error": {"code": "moderation_blocked", "message": "blocked by moderation"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/videos/video_bad/content"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .synthesize_video("sora-2", "anything", 4)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("blocked by moderation"));
    }
}

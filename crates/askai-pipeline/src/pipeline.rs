// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation orchestrator.
//!
//! Every create operation runs the same linear sequence and stops at the
//! first failure:
//!
//! 1. verify the bearer credential,
//! 2. require the verified email to equal the body's email,
//! 3. call the provider with the caller's own key,
//! 4. upload the artifact (images and videos),
//! 5. insert the record.
//!
//! The insert is the last step, so a failure anywhere earlier leaves no row
//! behind. Nothing is compensated: if the upload fails after a successful
//! generation, the generated content is dropped and the caller resubmits.

use std::sync::Arc;

use askai_core::types::{DateRange, ImageExchange, NewExchange, Principal, TextExchange, VideoExchange};
use askai_core::{
    ArtifactStore, AskaiError, GenerationProvider, ProviderConnector, RecordStore, TokenVerifier,
};
use chrono::Utc;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::keys::{IMAGE_CONTENT_TYPE, VIDEO_CONTENT_TYPE, image_key_suffix, video_key_suffix};
use crate::request::{ChatRequest, ImageRequest, VideoRequest};

/// Composes the external systems behind the generation endpoints.
#[derive(Clone)]
pub struct GenerationPipeline {
    verifier: Arc<dyn TokenVerifier>,
    connector: Arc<dyn ProviderConnector>,
    artifacts: Arc<dyn ArtifactStore>,
    records: Arc<dyn RecordStore>,
}

impl GenerationPipeline {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        connector: Arc<dyn ProviderConnector>,
        artifacts: Arc<dyn ArtifactStore>,
        records: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            verifier,
            connector,
            artifacts,
            records,
        }
    }

    /// Verifies the header and checks that the caller owns `claimed_email`.
    async fn authorize(
        &self,
        authorization: Option<&str>,
        claimed_email: &str,
    ) -> Result<Principal, AskaiError> {
        let principal = self.verifier.verify_header(authorization).await.inspect_err(|e| {
            debug!(error = %e, "credential rejected");
        })?;
        if principal.email != claimed_email {
            warn!(
                principal = %principal.email,
                claimed = %claimed_email,
                "ownership mismatch"
            );
            return Err(AskaiError::Forbidden {
                message: "authenticated email does not match request email".into(),
            });
        }
        Ok(principal)
    }

    fn provider(&self, key: SecretString) -> Result<Box<dyn GenerationProvider>, AskaiError> {
        self.connector.connect(key)
    }

    /// Runs the text pipeline and returns the persisted exchange.
    pub async fn create_text(
        &self,
        authorization: Option<&str>,
        request: ChatRequest,
    ) -> Result<TextExchange, AskaiError> {
        let principal = self.authorize(authorization, &request.email).await?;
        let provider = self.provider(request.provider_key)?;

        debug!(owner = %principal.email, model = %request.model, "generating text");
        let answer = provider
            .complete(&request.model, &request.question)
            .await
            .inspect_err(|e| warn!(model = %request.model, error = %e, "text generation failed"))?;

        let record = self
            .records
            .insert_text(NewExchange {
                owner_email: principal.email,
                model_id: request.model,
                prompt: request.question,
                output: answer,
            })
            .await?;
        info!(id = record.id, model = %record.model_id, "text exchange stored");
        Ok(record)
    }

    /// Runs the image pipeline and returns the persisted exchange.
    ///
    /// If the insert fails after the upload succeeded, the object stays in
    /// the artifact store with no record pointing at it.
    pub async fn create_image(
        &self,
        authorization: Option<&str>,
        request: ImageRequest,
    ) -> Result<ImageExchange, AskaiError> {
        let principal = self.authorize(authorization, &request.email).await?;
        let provider = self.provider(request.provider_key)?;

        debug!(owner = %principal.email, model = %request.model, "generating image");
        let bytes = provider
            .synthesize_image(&request.model, &request.description)
            .await
            .inspect_err(|e| warn!(model = %request.model, error = %e, "image generation failed"))?;

        let artifact_url = self
            .artifacts
            .put(
                &principal.email,
                &image_key_suffix(Utc::now()),
                bytes,
                IMAGE_CONTENT_TYPE,
            )
            .await
            .inspect_err(|e| warn!(error = %e, "image upload failed, discarding result"))?;

        let record = self
            .records
            .insert_image(NewExchange {
                owner_email: principal.email,
                model_id: request.model,
                prompt: request.description,
                output: artifact_url,
            })
            .await
            .inspect_err(|e| warn!(error = %e, "record insert failed after upload"))?;
        info!(id = record.id, model = %record.model_id, "image exchange stored");
        Ok(record)
    }

    /// Runs the video pipeline and returns the persisted exchange.
    ///
    /// Holds the request open for the whole provider job.
    pub async fn create_video(
        &self,
        authorization: Option<&str>,
        request: VideoRequest,
    ) -> Result<VideoExchange, AskaiError> {
        let principal = self.authorize(authorization, &request.email).await?;
        let provider = self.provider(request.provider_key)?;

        debug!(
            owner = %principal.email,
            model = %request.model,
            duration = request.duration,
            "generating video"
        );
        let video = provider
            .synthesize_video(&request.model, &request.content, request.duration)
            .await
            .inspect_err(|e| warn!(model = %request.model, error = %e, "video generation failed"))?;

        let suffix = video_key_suffix(&video.job_id)?;
        let artifact_url = self
            .artifacts
            .put(
                &principal.email,
                &suffix,
                video.bytes,
                VIDEO_CONTENT_TYPE,
            )
            .await
            .inspect_err(|e| warn!(error = %e, "video upload failed, discarding result"))?;

        let record = self
            .records
            .insert_video(NewExchange {
                owner_email: principal.email,
                model_id: request.model,
                prompt: request.content,
                output: artifact_url,
            })
            .await
            .inspect_err(|e| warn!(error = %e, "record insert failed after upload"))?;
        info!(id = record.id, model = %record.model_id, "video exchange stored");
        Ok(record)
    }

    /// The caller's text history inside `range`, newest first.
    pub async fn list_text(
        &self,
        authorization: Option<&str>,
        range: DateRange,
    ) -> Result<Vec<TextExchange>, AskaiError> {
        let principal = self.verifier.verify_header(authorization).await?;
        self.records.query_text(&principal.email, range).await
    }

    /// The caller's image history inside `range`, newest first.
    pub async fn list_images(
        &self,
        authorization: Option<&str>,
        range: DateRange,
    ) -> Result<Vec<ImageExchange>, AskaiError> {
        let principal = self.verifier.verify_header(authorization).await?;
        self.records.query_images(&principal.email, range).await
    }

    /// The caller's video history inside `range`, newest first.
    pub async fn list_videos(
        &self,
        authorization: Option<&str>,
        range: DateRange,
    ) -> Result<Vec<VideoExchange>, AskaiError> {
        let principal = self.verifier.verify_header(authorization).await?;
        self.records.query_videos(&principal.email, range).await
    }
}

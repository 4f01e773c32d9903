// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Video job polling state machine.
//!
//! A job moves `Submitted -> Polling -> {Completed | Failed}`. Polling backs
//! off exponentially up to a cap, and the whole sequence (submit, polls,
//! download) runs under a single deadline.

use std::time::Duration;

use askai_config::model::VideoConfig;
use askai_core::{AskaiError, GeneratedVideo, is_valid_job_id};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::types::{VideoCreateRequest, VideoJob, VideoStatus};

/// The three provider calls a video job needs.
#[async_trait]
pub trait VideoJobApi: Send + Sync {
    async fn submit(&self, request: &VideoCreateRequest) -> Result<VideoJob, AskaiError>;

    async fn retrieve(&self, job_id: &str) -> Result<VideoJob, AskaiError>;

    async fn download(&self, job_id: &str) -> Result<Vec<u8>, AskaiError>;
}

/// Backoff and deadline settings for one video job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
    pub deadline: Duration,
}

impl PollPolicy {
    pub fn from_config(config: &VideoConfig) -> Self {
        Self {
            initial: Duration::from_millis(config.poll_initial_ms),
            max: Duration::from_millis(config.poll_max_ms),
            multiplier: config.poll_multiplier,
            deadline: Duration::from_secs(config.deadline_secs),
        }
    }

    /// Delay before the poll that follows one made after `current`.
    /// Saturates at `max` when the product does not fit a `Duration`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .map_or(self.max, |next| next.min(self.max))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_config(&VideoConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoJobState {
    Submitted { job_id: String },
    Polling { job_id: String, delay: Duration },
    Completed { job_id: String },
    Failed { job_id: String, reason: String },
}

impl VideoJobState {
    /// Classifies a status reply for `job_id`. The reply's own id is ignored.
    fn observe(job_id: String, job: VideoJob, delay: Duration) -> Self {
        match job.status {
            VideoStatus::Completed => Self::Completed { job_id },
            VideoStatus::Failed => Self::Failed {
                reason: job
                    .error
                    .map(|e| e.message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "no reason given".into()),
                job_id,
            },
            VideoStatus::Queued | VideoStatus::InProgress | VideoStatus::Unknown => {
                debug!(job_id = %job_id, status = ?job.status, progress = ?job.progress, "video job pending");
                Self::Polling { job_id, delay }
            }
        }
    }
}

/// Submits a job and waits for its content.
///
/// Fails with [`AskaiError::Timeout`] when `policy.deadline` passes first and
/// with [`AskaiError::Provider`] when the job ends in `failed`. A failed job
/// is never retried.
pub async fn run_video_job(
    api: &dyn VideoJobApi,
    policy: &PollPolicy,
    request: VideoCreateRequest,
) -> Result<GeneratedVideo, AskaiError> {
    match tokio::time::timeout(policy.deadline, drive(api, policy, request)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(deadline = ?policy.deadline, "video job exceeded its deadline");
            Err(AskaiError::Timeout {
                duration: policy.deadline,
            })
        }
    }
}

async fn drive(
    api: &dyn VideoJobApi,
    policy: &PollPolicy,
    request: VideoCreateRequest,
) -> Result<GeneratedVideo, AskaiError> {
    let job = api.submit(&request).await?;
    if !is_valid_job_id(&job.id) {
        warn!(job_id = ?job.id, "provider returned an unusable video job id");
        return Err(AskaiError::provider("provider returned an invalid video job id"));
    }
    info!(job_id = %job.id, model = %request.model, "video job submitted");
    let mut state = VideoJobState::Submitted { job_id: job.id };

    loop {
        state = match state {
            VideoJobState::Submitted { job_id } => VideoJobState::Polling {
                job_id,
                delay: policy.initial,
            },
            VideoJobState::Polling { job_id, delay } => {
                tokio::time::sleep(delay).await;
                let job = api.retrieve(&job_id).await?;
                VideoJobState::observe(job_id, job, policy.next_delay(delay))
            }
            VideoJobState::Completed { job_id } => {
                let bytes = api.download(&job_id).await?;
                info!(job_id = %job_id, size = bytes.len(), "video job completed");
                return Ok(GeneratedVideo { job_id, bytes });
            }
            VideoJobState::Failed { job_id, reason } => {
                return Err(AskaiError::provider(format!(
                    "video job {job_id} failed: {reason}"
                )));
            }
        };
    }
}

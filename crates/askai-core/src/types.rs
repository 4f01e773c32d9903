// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the generation pipeline.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the external seam an adapter sits on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Identity,
    BotCheck,
    Provider,
    ArtifactStore,
    RecordStore,
}

/// The three content kinds the backend generates and persists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Text,
    Image,
    Video,
}

/// A verified identity extracted from an identity-provider token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A completed text generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextExchange {
    pub id: i64,
    #[serde(rename = "email")]
    pub owner_email: String,
    #[serde(rename = "model")]
    pub model_id: String,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(rename = "answer")]
    pub response_text: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// A completed image generation. `artifact_url` addresses the uploaded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageExchange {
    pub id: i64,
    #[serde(rename = "email")]
    pub owner_email: String,
    #[serde(rename = "model")]
    pub model_id: String,
    #[serde(rename = "description")]
    pub prompt: String,
    #[serde(rename = "image")]
    pub artifact_url: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// A completed video generation. `artifact_url` addresses the uploaded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoExchange {
    pub id: i64,
    #[serde(rename = "email")]
    pub owner_email: String,
    #[serde(rename = "model")]
    pub model_id: String,
    #[serde(rename = "content")]
    pub prompt: String,
    #[serde(rename = "video")]
    pub artifact_url: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload shared by all three kinds.
///
/// `output` is the response text for [`ExchangeKind::Text`] and the artifact
/// URL for the other kinds. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExchange {
    pub owner_email: String,
    pub model_id: String,
    pub prompt: String,
    pub output: String,
}

/// Finished video content together with the provider job that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedVideo {
    pub job_id: String,
    pub bytes: Vec<u8>,
}

/// Longest provider job id accepted.
pub const MAX_JOB_ID_LEN: usize = 128;

/// True for non-empty ids made only of ASCII letters, digits, `_` and `-`.
///
/// Job ids end up in provider URL paths and object keys.
pub fn is_valid_job_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_JOB_ID_LEN
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Optional inclusive calendar-date window for history queries (UTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Inclusive lower bound: midnight at the start of `start_date`.
    pub fn lower_bound(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Exclusive upper bound: midnight at the start of the day after `end_date`.
    pub fn upper_bound(&self) -> Option<DateTime<Utc>> {
        self.end_date.map(|d| {
            d.checked_add_days(Days::new(1))
                .unwrap_or(NaiveDate::MAX)
                .and_time(NaiveTime::MIN)
                .and_utc()
        })
    }

    /// Returns true if `ts` falls inside `[lower_bound, upper_bound)`.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.lower_bound().is_none_or(|lo| ts >= lo) && self.upper_bound().is_none_or(|hi| ts < hi)
    }
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::AskaiConfig;

/// Largest accepted growth factor between video status polls.
pub const MAX_POLL_MULTIPLIER: f64 = 10.0;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &AskaiConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.server.host.trim().is_empty() {
        fail("server.host must not be empty".to_string());
    }

    let origin = config.server.allowed_origin.trim();
    if !(origin.starts_with("https://") || origin.starts_with("http://")) {
        fail(format!(
            "server.allowed_origin `{origin}` must be an http(s) origin"
        ));
    } else if origin.ends_with('/') {
        fail(format!(
            "server.allowed_origin `{origin}` must not end with a slash"
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.identity.issuers.is_empty() {
        fail("identity.issuers must list at least one issuer".to_string());
    }

    let artifacts = &config.artifacts;
    if artifacts.bucket.trim().is_empty() {
        fail("artifacts.bucket must not be empty".to_string());
    }
    if artifacts.region.trim().is_empty() {
        fail("artifacts.region must not be empty".to_string());
    }
    if artifacts.access_key_id.is_some() != artifacts.secret_access_key.is_some() {
        fail(
            "artifacts.access_key_id and artifacts.secret_access_key must be set together"
                .to_string(),
        );
    }

    if config.provider.request_timeout_secs == 0 {
        fail("provider.request_timeout_secs must be positive".to_string());
    }

    let video = &config.video;
    if video.poll_initial_ms == 0 {
        fail("video.poll_initial_ms must be positive".to_string());
    }
    if video.poll_initial_ms > video.poll_max_ms {
        fail(format!(
            "video.poll_initial_ms ({}) must not exceed video.poll_max_ms ({})",
            video.poll_initial_ms, video.poll_max_ms
        ));
    }
    if !(1.0..=MAX_POLL_MULTIPLIER).contains(&video.poll_multiplier) {
        fail(format!(
            "video.poll_multiplier must be between 1.0 and {MAX_POLL_MULTIPLIER}, got {}",
            video.poll_multiplier
        ));
    }
    if video.deadline_secs == 0 {
        fail("video.deadline_secs must be positive".to_string());
    }

    let http = &config.http;
    if http.timeout_secs == 0 {
        fail("http.timeout_secs must be positive".to_string());
    }
    if http.connect_timeout_secs == 0 {
        fail("http.connect_timeout_secs must be positive".to_string());
    }
    if http.connect_timeout_secs > http.timeout_secs {
        fail(format!(
            "http.connect_timeout_secs ({}) must not exceed http.timeout_secs ({})",
            http.connect_timeout_secs, http.timeout_secs
        ));
    }
    if !is_resolution(&video.size) {
        fail(format!(
            "video.size `{}` must look like <width>x<height>",
            video.size
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_resolution(size: &str) -> bool {
    size.split_once('x').is_some_and(|(w, h)| {
        w.parse::<u32>().is_ok_and(|w| w > 0) && h.parse::<u32>().is_ok_and(|h| h > 0)
    })
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object-key suffixes and content types for generated artifacts.
//!
//! The artifact store prefixes every suffix with the owner's email.

use askai_core::{AskaiError, is_valid_job_id};
use chrono::{DateTime, Utc};

pub const IMAGE_CONTENT_TYPE: &str = "image/png";
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// `image<yyyymmddHHMMSSmmm>-<8 hex>.png`.
///
/// The random tail keeps two images from the same millisecond apart.
pub fn image_key_suffix(now: DateTime<Utc>) -> String {
    let tail = uuid::Uuid::new_v4().simple().to_string();
    format!("image{}-{}.png", now.format("%Y%m%d%H%M%S%3f"), &tail[..8])
}

/// Videos are stored under the provider's job id, which is already unique.
///
/// Ids that could escape the owner's prefix are refused.
pub fn video_key_suffix(job_id: &str) -> Result<String, AskaiError> {
    if !is_valid_job_id(job_id) {
        return Err(AskaiError::provider(format!(
            "video job id {job_id:?} cannot be used as an object key"
        )));
    }
    Ok(job_id.to_string())
}

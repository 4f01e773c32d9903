// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object storage trait for generated binary artifacts.

use async_trait::async_trait;

use crate::error::AskaiError;
use crate::traits::adapter::PluginAdapter;

/// Uploads generated artifacts and returns their public address.
#[async_trait]
pub trait ArtifactStore: PluginAdapter {
    /// Uploads `bytes` under `<owner_email>/<key_suffix>`.
    ///
    /// Returns the deterministic public URL of the object. The URL is only
    /// returned after the upload has been acknowledged.
    async fn put(
        &self,
        owner_email: &str,
        key_suffix: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AskaiError>;
}

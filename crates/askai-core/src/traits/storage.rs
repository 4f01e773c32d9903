// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait for the three exchange kinds.

use async_trait::async_trait;

use crate::error::AskaiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{DateRange, ImageExchange, NewExchange, TextExchange, VideoExchange};

/// Append-only, owner-scoped persistence for completed generations.
///
/// The store assigns `id` and `created_at`. It has no authorization concept:
/// callers must pass the verified owner. Queries return records most recent
/// first, ties broken by insertion order.
#[async_trait]
pub trait RecordStore: PluginAdapter {
    async fn insert_text(&self, record: NewExchange) -> Result<TextExchange, AskaiError>;

    async fn insert_image(&self, record: NewExchange) -> Result<ImageExchange, AskaiError>;

    async fn insert_video(&self, record: NewExchange) -> Result<VideoExchange, AskaiError>;

    async fn query_text(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<TextExchange>, AskaiError>;

    async fn query_images(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<ImageExchange>, AskaiError>;

    async fn query_videos(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<VideoExchange>, AskaiError>;
}

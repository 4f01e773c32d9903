// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RecordStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use askai_config::model::StorageConfig;
use askai_core::types::{
    AdapterType, DateRange, ExchangeKind, HealthStatus, ImageExchange, NewExchange, TextExchange,
    VideoExchange,
};
use askai_core::{AskaiError, PluginAdapter, RecordStore};

use crate::database::{Database, map_tr_err};
use crate::queries::exchanges::{self, ExchangeRow};

/// SQLite-backed record store.
///
/// The database is opened lazily by [`SqliteStorage::initialize`]; every
/// other call fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Opens the database and applies migrations.
    pub async fn initialize(&self) -> Result<(), AskaiError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| AskaiError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoints the WAL. Safe to call when never initialized.
    pub async fn close(&self) -> Result<(), AskaiError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
        }
        Ok(())
    }

    fn db(&self) -> Result<&Database, AskaiError> {
        self.db.get().ok_or_else(|| AskaiError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

fn text_record(row: ExchangeRow) -> TextExchange {
    TextExchange {
        id: row.id,
        owner_email: row.owner_email,
        model_id: row.model_id,
        prompt: row.prompt,
        response_text: row.output,
        created_at: row.created_at,
    }
}

fn image_record(row: ExchangeRow) -> ImageExchange {
    ImageExchange {
        id: row.id,
        owner_email: row.owner_email,
        model_id: row.model_id,
        prompt: row.prompt,
        artifact_url: row.output,
        created_at: row.created_at,
    }
}

fn video_record(row: ExchangeRow) -> VideoExchange {
    VideoExchange {
        id: row.id,
        owner_email: row.owner_email,
        model_id: row.model_id,
        prompt: row.prompt,
        artifact_url: row.output,
        created_at: row.created_at,
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecordStore
    }

    async fn health_check(&self) -> Result<HealthStatus, AskaiError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl RecordStore for SqliteStorage {
    async fn insert_text(&self, record: NewExchange) -> Result<TextExchange, AskaiError> {
        exchanges::insert_exchange(self.db()?, ExchangeKind::Text, record)
            .await
            .map(text_record)
    }

    async fn insert_image(&self, record: NewExchange) -> Result<ImageExchange, AskaiError> {
        exchanges::insert_exchange(self.db()?, ExchangeKind::Image, record)
            .await
            .map(image_record)
    }

    async fn insert_video(&self, record: NewExchange) -> Result<VideoExchange, AskaiError> {
        exchanges::insert_exchange(self.db()?, ExchangeKind::Video, record)
            .await
            .map(video_record)
    }

    async fn query_text(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<TextExchange>, AskaiError> {
        let rows = exchanges::query_exchanges(self.db()?, ExchangeKind::Text, owner_email, range).await?;
        Ok(rows.into_iter().map(text_record).collect())
    }

    async fn query_images(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<ImageExchange>, AskaiError> {
        let rows = exchanges::query_exchanges(self.db()?, ExchangeKind::Image, owner_email, range).await?;
        Ok(rows.into_iter().map(image_record).collect())
    }

    async fn query_videos(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<VideoExchange>, AskaiError> {
        let rows = exchanges::query_exchanges(self.db()?, ExchangeKind::Video, owner_email, range).await?;
        Ok(rows.into_iter().map(video_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            database_path: dir.path().join("askai.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn calls_before_initialize_fail() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir));
        let err = storage
            .query_text("a@x.com", DateRange::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AskaiError::Storage { .. }));
        assert!(storage.close().await.is_ok());
    }

    #[tokio::test]
    async fn double_initialize_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir));
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn records_round_trip_through_each_kind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir));
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);

        let text = storage
            .insert_text(NewExchange {
                owner_email: "a@x.com".into(),
                model_id: "gpt-5.2".into(),
                prompt: "2+2?".into(),
                output: "4".into(),
            })
            .await
            .unwrap();
        let image = storage
            .insert_image(NewExchange {
                owner_email: "a@x.com".into(),
                model_id: "dall-e-3".into(),
                prompt: "a fox".into(),
                output: "https://askaiwithpy.s3.eu-north-1.amazonaws.com/a@x.com/image1.png".into(),
            })
            .await
            .unwrap();
        let video = storage
            .insert_video(NewExchange {
                owner_email: "a@x.com".into(),
                model_id: "sora-2".into(),
                prompt: "a cat".into(),
                output: "https://askaiwithpy.s3.eu-north-1.amazonaws.com/a@x.com/video_1".into(),
            })
            .await
            .unwrap();

        assert_eq!(storage.query_text("a@x.com", DateRange::default()).await.unwrap(), vec![text]);
        assert_eq!(storage.query_images("a@x.com", DateRange::default()).await.unwrap(), vec![image]);
        assert_eq!(storage.query_videos("a@x.com", DateRange::default()).await.unwrap(), vec![video]);
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn identical_requests_are_not_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir));
        storage.initialize().await.unwrap();
        let record = NewExchange {
            owner_email: "a@x.com".into(),
            model_id: "gpt-5.2".into(),
            prompt: "2+2?".into(),
            output: "4".into(),
        };

        storage.insert_text(record.clone()).await.unwrap();
        storage.insert_text(record).await.unwrap();
        let rows = storage.query_text("a@x.com", DateRange::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].id, rows[1].id);
    }
}

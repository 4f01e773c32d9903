// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring the real pipeline and SQLite store to fakes.
//!
//! `TestHarness` owns a temp database that lives as long as the harness.

use std::sync::Arc;

use askai_config::model::StorageConfig;
use askai_core::types::DateRange;
use askai_core::{AskaiError, RecordStore};
use askai_pipeline::{GenerationPipeline, LoginVerifier};
use askai_storage::SqliteStorage;

use crate::fakes::{
    FixedBotCheck, MemoryArtifactStore, ScriptedConnector, StaticTokenVerifier,
    SwitchableRecordStore,
};

/// Bearer token the harness accepts for [`OWNER_EMAIL`].
pub const OWNER_TOKEN: &str = "token-owner";
pub const OWNER_EMAIL: &str = "a@x.com";
/// Bearer token the harness accepts for [`OTHER_EMAIL`].
pub const OTHER_TOKEN: &str = "token-other";
pub const OTHER_EMAIL: &str = "b@x.com";

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    bot_verdict: bool,
    connector: ScriptedConnector,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            bot_verdict: true,
            connector: ScriptedConnector::new(),
        }
    }

    /// Verdict of the fake bot check (default: pass).
    pub fn with_bot_verdict(mut self, verdict: bool) -> Self {
        self.bot_verdict = verdict;
        self
    }

    /// Text the fake provider answers with.
    pub fn with_text_reply(mut self, text: &str) -> Self {
        self.connector.text = text.to_string();
        self
    }

    /// Job id the fake provider reports for videos.
    pub fn with_video_job_id(mut self, job_id: &str) -> Self {
        self.connector.video_job_id = job_id.to_string();
        self
    }

    pub async fn build(self) -> Result<TestHarness, AskaiError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| AskaiError::Storage { source: e.into() })?;
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: temp_dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }));
        storage.initialize().await?;

        let verifier = Arc::new(
            StaticTokenVerifier::new()
                .with_token(OWNER_TOKEN, OWNER_EMAIL)
                .with_token(OTHER_TOKEN, OTHER_EMAIL),
        );
        let bot_check = Arc::new(FixedBotCheck::new(self.bot_verdict));
        let connector = Arc::new(self.connector);
        let artifacts = Arc::new(MemoryArtifactStore::new());
        let records = Arc::new(SwitchableRecordStore::new(storage.clone()));

        let pipeline = GenerationPipeline::new(
            verifier.clone(),
            connector.clone(),
            artifacts.clone(),
            records.clone(),
        );
        let login = Arc::new(LoginVerifier::new(bot_check.clone(), verifier.clone()));

        Ok(TestHarness {
            pipeline,
            login,
            verifier,
            bot_check,
            connector,
            artifacts,
            records,
            storage,
            _temp_dir: temp_dir,
        })
    }
}

/// A pipeline over fakes plus a real temp SQLite store.
pub struct TestHarness {
    pub pipeline: GenerationPipeline,
    pub login: Arc<LoginVerifier>,
    pub verifier: Arc<StaticTokenVerifier>,
    pub bot_check: Arc<FixedBotCheck>,
    pub connector: Arc<ScriptedConnector>,
    pub artifacts: Arc<MemoryArtifactStore>,
    /// What the pipeline writes through; wraps `storage`.
    pub records: Arc<SwitchableRecordStore>,
    pub storage: Arc<SqliteStorage>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default fakes.
    pub async fn new() -> Result<Self, AskaiError> {
        Self::builder().build().await
    }

    /// `Authorization` header value for `token`.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Records of all three kinds stored for `email`.
    pub async fn record_count(&self, email: &str) -> Result<usize, AskaiError> {
        let all = DateRange::default();
        Ok(self.storage.query_text(email, all).await?.len()
            + self.storage.query_images(email, all).await?.len()
            + self.storage.query_videos(email, all).await?.len())
    }
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fakes for every external seam, each counting how often it was called.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use askai_core::types::{
    AdapterType, DateRange, GeneratedVideo, HealthStatus, ImageExchange, NewExchange, Principal,
    TextExchange, VideoExchange,
};
use askai_core::{
    ArtifactStore, AskaiError, BotCheck, GenerationProvider, PluginAdapter, ProviderConnector,
    RecordStore, TokenVerifier,
};

/// Accepts a fixed set of raw tokens.
#[derive(Default)]
pub struct StaticTokenVerifier {
    principals: HashMap<String, Principal>,
    calls: AtomicUsize,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as belonging to `email`.
    pub fn with_token(mut self, token: &str, email: &str) -> Self {
        self.principals.insert(
            token.to_string(),
            Principal {
                email: email.to_string(),
                name: Some(format!("User {email}")),
            },
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AskaiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.principals
            .get(token)
            .cloned()
            .ok_or_else(|| AskaiError::unauthenticated("unknown test token"))
    }
}

/// Bot check with a fixed verdict.
pub struct FixedBotCheck {
    verdict: bool,
    calls: AtomicUsize,
}

impl FixedBotCheck {
    pub fn new(verdict: bool) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BotCheck for FixedBotCheck {
    async fn check(&self, _challenge_token: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict
    }
}

/// Outcome a [`ScriptedConnector`] hands to every provider it creates.
#[derive(Debug, Clone)]
pub enum Script {
    Succeed,
    Fail(String),
}

/// Counts and inputs observed by scripted providers.
#[derive(Default)]
pub struct ProviderCalls {
    pub connects: AtomicUsize,
    pub completions: AtomicUsize,
    pub images: AtomicUsize,
    pub videos: AtomicUsize,
    keys: Mutex<Vec<String>>,
}

impl ProviderCalls {
    /// Calls that reached a generation method.
    pub fn generations(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
            + self.images.load(Ordering::SeqCst)
            + self.videos.load(Ordering::SeqCst)
    }

    /// Caller keys passed to `connect`, in order.
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().map(|k| k.clone()).unwrap_or_default()
    }
}

/// Connector whose providers answer from a script.
pub struct ScriptedConnector {
    script: Mutex<Script>,
    calls: Arc<ProviderCalls>,
    pub text: String,
    pub image: Vec<u8>,
    pub video_job_id: String,
    pub video: Vec<u8>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script::Succeed),
            calls: Arc::new(ProviderCalls::default()),
            text: "4".into(),
            image: b"\x89PNG-fake".to_vec(),
            video_job_id: "video_fake123".into(),
            video: b"mp4-fake".to_vec(),
        }
    }

    /// Switch every subsequent provider call to `script`.
    pub fn set_script(&self, script: Script) {
        if let Ok(mut current) = self.script.lock() {
            *current = script;
        }
    }

    pub fn calls(&self) -> &ProviderCalls {
        &self.calls
    }
}

impl Default for ScriptedConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderConnector for ScriptedConnector {
    fn connect(&self, api_key: SecretString) -> Result<Box<dyn GenerationProvider>, AskaiError> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut keys) = self.calls.keys.lock() {
            keys.push(api_key.expose_secret().to_string());
        }
        let script = self
            .script
            .lock()
            .map(|s| s.clone())
            .unwrap_or(Script::Succeed);
        Ok(Box::new(ScriptedProvider {
            script,
            calls: Arc::clone(&self.calls),
            text: self.text.clone(),
            image: self.image.clone(),
            video_job_id: self.video_job_id.clone(),
            video: self.video.clone(),
        }))
    }
}

struct ScriptedProvider {
    script: Script,
    calls: Arc<ProviderCalls>,
    text: String,
    image: Vec<u8>,
    video_job_id: String,
    video: Vec<u8>,
}

impl ScriptedProvider {
    fn outcome<T>(&self, value: T) -> Result<T, AskaiError> {
        match &self.script {
            Script::Succeed => Ok(value),
            Script::Fail(message) => Err(AskaiError::provider(message.clone())),
        }
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn complete(&self, _model_id: &str, _prompt: &str) -> Result<String, AskaiError> {
        self.calls.completions.fetch_add(1, Ordering::SeqCst);
        self.outcome(self.text.clone())
    }

    async fn synthesize_image(&self, _model_id: &str, _prompt: &str) -> Result<Vec<u8>, AskaiError> {
        self.calls.images.fetch_add(1, Ordering::SeqCst);
        self.outcome(self.image.clone())
    }

    async fn synthesize_video(
        &self,
        _model_id: &str,
        _prompt: &str,
        _duration_secs: u32,
    ) -> Result<GeneratedVideo, AskaiError> {
        self.calls.videos.fetch_add(1, Ordering::SeqCst);
        self.outcome(GeneratedVideo {
            job_id: self.video_job_id.clone(),
            bytes: self.video.clone(),
        })
    }
}

/// One stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory artifact store with a switchable failure mode.
pub struct MemoryArtifactStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    failing: AtomicBool,
    puts: AtomicUsize,
}

pub const MEMORY_ARTIFACT_BASE: &str = "https://artifacts.test";

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            puts: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent `put` fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Attempted uploads, failed ones included.
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl Default for MemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MemoryArtifactStore {
    fn name(&self) -> &str {
        "memory-artifacts"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ArtifactStore
    }

    async fn health_check(&self) -> Result<HealthStatus, AskaiError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(
        &self,
        owner_email: &str,
        key_suffix: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AskaiError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AskaiError::artifact("simulated upload failure"));
        }
        let key = format!("{owner_email}/{key_suffix}");
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| AskaiError::artifact("object map poisoned"))?;
        objects.insert(
            key.clone(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{MEMORY_ARTIFACT_BASE}/{key}"))
    }
}

/// Delegates to a real record store, with switchable insert failures.
pub struct SwitchableRecordStore {
    inner: Arc<dyn RecordStore>,
    failing_inserts: AtomicBool,
    inserts: AtomicUsize,
}

impl SwitchableRecordStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            failing_inserts: AtomicBool::new(false),
            inserts: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent insert fail. Queries keep working.
    pub fn set_failing_inserts(&self, failing: bool) {
        self.failing_inserts.store(failing, Ordering::SeqCst);
    }

    /// Attempted inserts, failed ones included.
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn before_insert(&self) -> Result<(), AskaiError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.failing_inserts.load(Ordering::SeqCst) {
            return Err(AskaiError::Storage {
                source: "simulated insert failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SwitchableRecordStore {
    fn name(&self) -> &str {
        "switchable-records"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecordStore
    }

    async fn health_check(&self) -> Result<HealthStatus, AskaiError> {
        self.inner.health_check().await
    }
}

#[async_trait]
impl RecordStore for SwitchableRecordStore {
    async fn insert_text(&self, record: NewExchange) -> Result<TextExchange, AskaiError> {
        self.before_insert()?;
        self.inner.insert_text(record).await
    }

    async fn insert_image(&self, record: NewExchange) -> Result<ImageExchange, AskaiError> {
        self.before_insert()?;
        self.inner.insert_image(record).await
    }

    async fn insert_video(&self, record: NewExchange) -> Result<VideoExchange, AskaiError> {
        self.before_insert()?;
        self.inner.insert_video(record).await
    }

    async fn query_text(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<TextExchange>, AskaiError> {
        self.inner.query_text(owner_email, range).await
    }

    async fn query_images(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<ImageExchange>, AskaiError> {
        self.inner.query_images(owner_email, range).await
    }

    async fn query_videos(
        &self,
        owner_email: &str,
        range: DateRange,
    ) -> Result<Vec<VideoExchange>, AskaiError> {
        self.inner.query_videos(owner_email, range).await
    }
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the askai backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level askai configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AskaiConfig {
    /// HTTP listener and CORS settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Identity-provider (Google ID token) settings.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// reCAPTCHA settings for the login flow.
    #[serde(default)]
    pub bot_check: BotCheckConfig,

    /// SQLite record store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Object store settings for generated images and videos.
    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    /// Generation provider endpoint settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Per-model sampling and decoding policy.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Video job submission and polling settings.
    #[serde(default)]
    pub video: VideoConfig,

    /// Outbound HTTP client used for identity, reCAPTCHA and object store calls.
    #[serde(default)]
    pub http: HttpConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// The single origin allowed by CORS (credentials enabled).
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origin() -> String {
    "https://askaiwithpy.onrender.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Identity-provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// OAuth client id; required as the token audience.
    #[serde(default)]
    pub client_id: Option<String>,

    /// JWKS document holding the provider's current signing keys.
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,

    /// Accepted `iss` claim values.
    #[serde(default = "default_issuers")]
    pub issuers: Vec<String>,

    /// How long fetched keys are trusted before a refresh.
    #[serde(default = "default_jwks_cache_secs")]
    pub jwks_cache_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            jwks_url: default_jwks_url(),
            issuers: default_issuers(),
            jwks_cache_secs: default_jwks_cache_secs(),
        }
    }
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/oauth2/v3/certs".to_string()
}

fn default_issuers() -> Vec<String> {
    vec![
        "accounts.google.com".to_string(),
        "https://accounts.google.com".to_string(),
    ]
}

fn default_jwks_cache_secs() -> u64 {
    3600
}

/// reCAPTCHA configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotCheckConfig {
    /// Server-side secret. `None` makes every check fail closed.
    #[serde(default)]
    pub secret: Option<String>,

    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

impl Default for BotCheckConfig {
    fn default() -> Self {
        Self {
            secret: None,
            verify_url: default_verify_url(),
        }
    }
}

impl std::fmt::Debug for BotCheckConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotCheckConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .field("verify_url", &self.verify_url)
            .finish()
    }
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "askai.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// S3-compatible object store configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Path-style endpoint override (e.g. MinIO). `None` uses AWS
    /// virtual-hosted addressing.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Prefix for persisted URLs. `None` derives it from bucket and region.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
            public_base_url: None,
        }
    }
}

impl std::fmt::Debug for ArtifactsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactsConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[redacted]"),
            )
            .field("endpoint", &self.endpoint)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

fn default_bucket() -> String {
    "askaiwithpy".to_string()
}

fn default_region() -> String {
    "eu-north-1".to_string()
}

/// Generation provider configuration.
///
/// There is deliberately no API key here: callers supply their own per request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// Per-HTTP-call timeout. Video polling has its own deadline.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_provider_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

/// Per-model policy table. Matching is by exact model id; anything not
/// listed takes the fallback branch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Models sampled deterministically (temperature 0). Others use 1.
    #[serde(default = "default_precise_models")]
    pub precise_models: Vec<String>,

    /// Image models that answer with a remote URL. Others answer inline base64.
    #[serde(default = "default_url_image_models")]
    pub url_image_models: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            precise_models: default_precise_models(),
            url_image_models: default_url_image_models(),
        }
    }
}

fn default_precise_models() -> Vec<String> {
    vec!["gpt-5.2".to_string()]
}

fn default_url_image_models() -> Vec<String> {
    vec!["dall-e-3".to_string()]
}

/// Video submission and polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VideoConfig {
    /// Target resolution sent with every job.
    #[serde(default = "default_video_size")]
    pub size: String,

    #[serde(default = "default_poll_initial_ms")]
    pub poll_initial_ms: u64,

    #[serde(default = "default_poll_max_ms")]
    pub poll_max_ms: u64,

    #[serde(default = "default_poll_multiplier")]
    pub poll_multiplier: f64,

    /// Hard limit on the whole submit-poll-download sequence.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            size: default_video_size(),
            poll_initial_ms: default_poll_initial_ms(),
            poll_max_ms: default_poll_max_ms(),
            poll_multiplier: default_poll_multiplier(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

fn default_video_size() -> String {
    "1280x720".to_string()
}

fn default_poll_initial_ms() -> u64 {
    2_000
}

fn default_poll_max_ms() -> u64 {
    15_000
}

fn default_poll_multiplier() -> f64 {
    2.0
}

fn default_deadline_secs() -> u64 {
    600
}

/// Shared outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Whole-request limit, from connect to the last body byte.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_http_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let config = AskaiConfig {
            bot_check: BotCheckConfig {
                secret: Some("recaptcha-secret".into()),
                ..BotCheckConfig::default()
            },
            artifacts: ArtifactsConfig {
                access_key_id: Some("AKIDEXAMPLE".into()),
                secret_access_key: Some("aws-secret".into()),
                ..ArtifactsConfig::default()
            },
            ..AskaiConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("recaptcha-secret"));
        assert!(!debug.contains("aws-secret"));
        assert!(debug.contains("AKIDEXAMPLE"));
    }

    #[test]
    fn policy_defaults_name_the_known_special_models() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.precise_models, vec!["gpt-5.2"]);
        assert_eq!(policy.url_image_models, vec!["dall-e-3"]);
    }
}

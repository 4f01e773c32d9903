// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the askai configuration system.

use askai_config::diagnostic::ConfigError;
use askai_config::{load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes_into_askai_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
allowed_origin = "https://app.example.com"
log_level = "debug"

[identity]
client_id = "1234.apps.googleusercontent.com"
jwks_cache_secs = 60

[bot_check]
secret = "captcha"

[storage]
database_path = "/var/lib/askai/askai.db"
wal_mode = false

[artifacts]
bucket = "media"
region = "us-east-1"
access_key_id = "AKID"
secret_access_key = "SECRET"
endpoint = "http://127.0.0.1:9000"

[provider]
base_url = "http://127.0.0.1:8081/v1"
request_timeout_secs = 30

[policy]
precise_models = ["gpt-5.2", "o3-mini"]
url_image_models = []

[video]
size = "720x1280"
poll_initial_ms = 500
poll_max_ms = 4000
poll_multiplier = 1.5
deadline_secs = 120
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.allowed_origin, "https://app.example.com");
    assert_eq!(
        config.identity.client_id.as_deref(),
        Some("1234.apps.googleusercontent.com")
    );
    assert_eq!(config.identity.jwks_cache_secs, 60);
    assert_eq!(config.identity.issuers.len(), 2);
    assert_eq!(config.bot_check.secret.as_deref(), Some("captcha"));
    assert!(!config.storage.wal_mode);
    assert_eq!(config.artifacts.endpoint.as_deref(), Some("http://127.0.0.1:9000"));
    assert_eq!(config.provider.request_timeout_secs, 30);
    assert_eq!(config.policy.precise_models, vec!["gpt-5.2", "o3-mini"]);
    assert!(config.policy.url_image_models.is_empty());
    assert_eq!(config.video.size, "720x1280");
    assert_eq!(config.video.deadline_secs, 120);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.allowed_origin, "https://askaiwithpy.onrender.com");
    assert!(config.identity.client_id.is_none());
    assert_eq!(
        config.identity.jwks_url,
        "https://www.googleapis.com/oauth2/v3/certs"
    );
    assert_eq!(
        config.bot_check.verify_url,
        "https://www.google.com/recaptcha/api/siteverify"
    );
    assert_eq!(config.storage.database_path, "askai.db");
    assert_eq!(config.artifacts.bucket, "askaiwithpy");
    assert_eq!(config.artifacts.region, "eu-north-1");
    assert_eq!(config.provider.base_url, "https://api.openai.com/v1");
    assert_eq!(config.video.size, "1280x720");
    assert_eq!(config.video.deadline_secs, 600);
}

#[test]
fn unknown_key_is_rejected() {
    let err = load_config_from_str("[server]\nprot = 80\n").expect_err("should reject");
    let msg = err.to_string();
    assert!(
        msg.contains("unknown field") || msg.contains("prot"),
        "got: {msg}"
    );
}

#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let errors = load_and_validate_str("[artifacts]\nbuckt = \"x\"\n").unwrap_err();
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "bucket"
    )));
}

#[test]
fn wrong_type_is_reported_as_invalid_type() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn semantic_errors_surface_from_load_and_validate() {
    let errors = load_and_validate_str("[video]\ndeadline_secs = 0\n").unwrap_err();
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("deadline_secs"))
    ));
}

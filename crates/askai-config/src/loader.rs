// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./askai.toml` > `<config_dir>/askai/askai.toml` >
//! `/etc/askai/askai.toml`, then environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AskaiConfig;

/// Config sections addressable through `ASKAI_<SECTION>_<KEY>` variables.
const SECTIONS: &[&str] = &[
    "server",
    "identity",
    "bot_check",
    "storage",
    "artifacts",
    "provider",
    "policy",
    "video",
    "http",
];

/// Variables the deployment environment already sets, and the keys they feed.
const DEPLOYMENT_VARS: &[(&str, &str)] = &[
    ("client_id", "identity.client_id"),
    ("recaptcha_secret_key", "bot_check.secret"),
    ("aws_access_key_id", "artifacts.access_key_id"),
    ("aws_secret_access_key", "artifacts.secret_access_key"),
    ("aws_default_region", "artifacts.region"),
    ("database_path", "storage.database_path"),
];

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/askai/askai.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "askai.toml";

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("askai/askai.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/askai/askai.toml`
/// 3. `<config_dir>/askai/askai.toml`
/// 4. `./askai.toml`
/// 5. Deployment variables (`CLIENT_ID`, `AWS_ACCESS_KEY_ID`, ...)
/// 6. `ASKAI_*` environment variables
pub fn load_config() -> Result<AskaiConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<AskaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AskaiConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AskaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AskaiConfig::default()))
        .merge(Toml::file(path))
        .merge(deployment_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AskaiConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(deployment_env_provider())
        .merge(env_provider())
}

/// Maps `ASKAI_<SECTION>_<KEY>` onto `<section>.<key>`.
///
/// Only the first matching section prefix is rewritten, so keys that contain
/// underscores (`bot_check.verify_url`, `video.poll_max_ms`) stay intact.
fn env_provider() -> Env {
    Env::prefixed("ASKAI_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        let mapped = SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or(key);
        mapped.into()
    })
}

fn deployment_env_provider() -> Env {
    let names: Vec<&str> = DEPLOYMENT_VARS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        let mapped = DEPLOYMENT_VARS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, target)| target.to_string())
            .unwrap_or(key);
        mapped.into()
    })
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies of the public endpoints.
//!
//! The caller's provider key is held in a [`SecretString`], so `Debug`
//! output of a request never shows it.

use std::fmt;

use secrecy::SecretString;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// `POST /chats/` body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub email: String,
    pub model: String,
    pub question: String,
    #[serde(alias = "openaiapi_key")]
    pub provider_key: SecretString,
}

/// `POST /images/` body.
#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub email: String,
    pub model: String,
    pub description: String,
    #[serde(alias = "openaiapi_key")]
    pub provider_key: SecretString,
}

/// `POST /videos/` body.
#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub email: String,
    pub model: String,
    /// Clip length in seconds; accepted as `"8"` or `8`.
    #[serde(deserialize_with = "positive_seconds")]
    pub duration: u32,
    pub content: String,
    #[serde(alias = "openaiapi_key")]
    pub provider_key: SecretString,
}

/// `POST /verify-login` body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub google_token: String,
    pub recaptcha_token: String,
}

/// `POST /verify-login` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub name: Option<String>,
}

fn positive_seconds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct SecondsVisitor;

    impl Visitor<'_> for SecondsVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a positive number of seconds, as an integer or a string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            match u32::try_from(v) {
                Ok(secs) if secs > 0 => Ok(secs),
                _ => Err(E::invalid_value(de::Unexpected::Unsigned(v), &self)),
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            match u64::try_from(v) {
                Ok(v) => self.visit_u64(v),
                Err(_) => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            match v.trim().parse::<u64>() {
                Ok(n) => self.visit_u64(n),
                Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    deserializer.deserialize_any(SecondsVisitor)
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reCAPTCHA `siteverify` gate for the login flow.

use askai_config::model::BotCheckConfig;
use askai_core::types::{AdapterType, HealthStatus};
use askai_core::{AskaiError, BotCheck, PluginAdapter};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

/// Posts challenge tokens to the verification service.
///
/// Fails closed: a missing secret, a transport error, a non-2xx status or an
/// unparsable body all count as a rejection.
pub struct RecaptchaGate {
    client: reqwest::Client,
    secret: Option<SecretString>,
    verify_url: String,
}

impl RecaptchaGate {
    pub fn new(config: &BotCheckConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            secret: config.secret.clone().map(SecretString::from),
            verify_url: config.verify_url.clone(),
        }
    }

    async fn siteverify(&self, secret: &str, token: &str) -> Result<SiteVerifyResponse, reqwest::Error> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("secret", secret)
            .append_pair("response", token)
            .finish();
        self.client
            .post(&self.verify_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl BotCheck for RecaptchaGate {
    async fn check(&self, challenge_token: &str) -> bool {
        let Some(secret) = self.secret.as_ref() else {
            warn!("bot check secret is not configured, rejecting");
            return false;
        };

        match self.siteverify(secret.expose_secret(), challenge_token).await {
            Ok(verdict) if verdict.success => {
                debug!("bot check passed");
                true
            }
            Ok(verdict) => {
                debug!(error_codes = ?verdict.error_codes, "bot check rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "bot check service unreachable, rejecting");
                false
            }
        }
    }
}

#[async_trait]
impl PluginAdapter for RecaptchaGate {
    fn name(&self) -> &str {
        "recaptcha"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::BotCheck
    }

    async fn health_check(&self) -> Result<HealthStatus, AskaiError> {
        Ok(match self.secret {
            Some(_) => HealthStatus::Healthy,
            None => HealthStatus::Degraded("bot_check.secret is not set; logins are refused".into()),
        })
    }
}

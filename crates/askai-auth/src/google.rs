// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google ID-token verification.

use std::time::Duration;

use askai_config::model::IdentityConfig;
use askai_core::types::{AdapterType, HealthStatus, Principal};
use askai_core::{AskaiError, PluginAdapter, TokenVerifier};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, Validation};
use serde::Deserialize;
use tracing::debug;

use crate::jwks::JwksCache;

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Verifies RS256 ID tokens issued by Google against the configured client id.
pub struct GoogleTokenVerifier {
    client_id: Option<String>,
    issuers: Vec<String>,
    keys: JwksCache,
}

impl GoogleTokenVerifier {
    pub fn new(config: &IdentityConfig, client: reqwest::Client) -> Self {
        Self {
            client_id: config.client_id.clone(),
            issuers: config.issuers.clone(),
            keys: JwksCache::new(
                client,
                config.jwks_url.clone(),
                Duration::from_secs(config.jwks_cache_secs),
            ),
        }
    }

    fn validation(&self, client_id: &str) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[client_id]);
        validation.set_issuer(&self.issuers);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AskaiError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| AskaiError::unauthenticated("identity client id is not configured"))?;

        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| AskaiError::unauthenticated(format!("malformed token: {e}")))?;
        if header.alg != Algorithm::RS256 {
            return Err(AskaiError::unauthenticated(format!(
                "unexpected signing algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AskaiError::unauthenticated("token header has no kid"))?;

        let key = self.keys.decoding_key(&kid).await?;
        let data = jsonwebtoken::decode::<IdTokenClaims>(token, &key, &self.validation(client_id))
            .map_err(|e| AskaiError::unauthenticated(format!("token rejected: {e}")))?;

        let email = data
            .claims
            .email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AskaiError::unauthenticated("token carries no email claim"))?;
        debug!(email = %email, "identity token verified");

        Ok(Principal {
            email,
            name: data.claims.name,
        })
    }
}

#[async_trait]
impl PluginAdapter for GoogleTokenVerifier {
    fn name(&self) -> &str {
        "google-id-token"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, AskaiError> {
        Ok(match self.client_id {
            Some(_) => HealthStatus::Healthy,
            None => HealthStatus::Unhealthy("identity.client_id is not set".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkeys::{TEST_CLIENT_ID, TEST_KID, jwks_body, mint, now_secs, valid_claims};
    use askai_core::ErrorKind;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn verifier(server: &MockServer, client_id: Option<&str>) -> GoogleTokenVerifier {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body()))
            .mount(server)
            .await;
        let config = IdentityConfig {
            client_id: client_id.map(str::to_string),
            jwks_url: format!("{}/oauth2/v3/certs", server.uri()),
            ..IdentityConfig::default()
        };
        GoogleTokenVerifier::new(&config, reqwest::Client::new())
    }

    fn assert_unauthenticated(result: Result<Principal, AskaiError>) {
        let err = result.expect_err("token should be rejected");
        assert_eq!(err.kind(), ErrorKind::Unauthenticated, "got {err}");
    }

    #[tokio::test]
    async fn valid_token_yields_principal() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        let token = mint(TEST_KID, &valid_claims("a@x.com"));

        let principal = verifier.verify(&token).await.unwrap();
        assert_eq!(principal.email, "a@x.com");
        assert_eq!(principal.name.as_deref(), Some("Alice Example"));
    }

    #[tokio::test]
    async fn header_form_is_accepted() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        let header = format!("Bearer {}", mint(TEST_KID, &valid_claims("a@x.com")));

        let principal = verifier.verify_header(Some(&header)).await.unwrap();
        assert_eq!(principal.email, "a@x.com");
    }

    #[tokio::test]
    async fn bare_issuer_form_is_accepted() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        let mut claims = valid_claims("a@x.com");
        claims["iss"] = "accounts.google.com".into();

        assert!(verifier.verify(&mint(TEST_KID, &claims)).await.is_ok());
    }

    #[tokio::test]
    async fn wrong_audience_is_rejected() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        let mut claims = valid_claims("a@x.com");
        claims["aud"] = "someone-else.apps.googleusercontent.com".into();

        assert_unauthenticated(verifier.verify(&mint(TEST_KID, &claims)).await);
    }

    #[tokio::test]
    async fn wrong_issuer_is_rejected() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        let mut claims = valid_claims("a@x.com");
        claims["iss"] = "https://evil.example.com".into();

        assert_unauthenticated(verifier.verify(&mint(TEST_KID, &claims)).await);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        let mut claims = valid_claims("a@x.com");
        claims["iat"] = (now_secs() - 7200).into();
        claims["exp"] = (now_secs() - 3600).into();

        assert_unauthenticated(verifier.verify(&mint(TEST_KID, &claims)).await);
    }

    #[tokio::test]
    async fn unknown_kid_is_rejected() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;

        assert_unauthenticated(
            verifier
                .verify(&mint("not-published", &valid_claims("a@x.com")))
                .await,
        );
    }

    #[tokio::test]
    async fn tampered_payload_is_rejected() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        let token = mint(TEST_KID, &valid_claims("a@x.com"));
        let forged = mint(TEST_KID, &valid_claims("mallory@x.com"));

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        assert_unauthenticated(verifier.verify(&parts.join(".")).await);
    }

    #[tokio::test]
    async fn missing_email_is_rejected() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        let mut claims = valid_claims("a@x.com");
        claims.as_object_mut().unwrap().remove("email");

        assert_unauthenticated(verifier.verify(&mint(TEST_KID, &claims)).await);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, Some(TEST_CLIENT_ID)).await;
        assert_unauthenticated(verifier.verify("not-a-jwt").await);
    }

    #[tokio::test]
    async fn unconfigured_client_id_rejects_everything() {
        let server = MockServer::start().await;
        let verifier = verifier(&server, None).await;
        let token = mint(TEST_KID, &valid_claims("a@x.com"));

        assert_unauthenticated(verifier.verify(&token).await);
        assert!(matches!(
            verifier.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }
}

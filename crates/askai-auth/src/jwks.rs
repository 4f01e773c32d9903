// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazily fetched, time-bounded cache of the identity provider's signing keys.

use std::time::Duration;

use askai_core::AskaiError;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Shortest gap between two fetches triggered by unknown `kid`s.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Caches a remote JWKS document for `ttl`.
///
/// A lookup for a `kid` that the cached set does not contain forces one
/// refresh, so key rotation is picked up before the TTL runs out. Such
/// refreshes happen at most once per `min_refresh`; concurrent lookups that
/// queue behind a refresh reuse its result.
pub struct JwksCache {
    client: reqwest::Client,
    url: String,
    ttl: Duration,
    min_refresh: Duration,
    state: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    pub fn new(client: reqwest::Client, url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            ttl,
            min_refresh: MIN_REFRESH_INTERVAL,
            state: RwLock::new(None),
        }
    }

    /// Overrides [`MIN_REFRESH_INTERVAL`].
    pub fn with_min_refresh(mut self, min_refresh: Duration) -> Self {
        self.min_refresh = min_refresh;
        self
    }

    /// Returns the decoding key for `kid`, fetching the key set if needed.
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AskaiError> {
        {
            let state = self.state.read().await;
            let fresh = state
                .as_ref()
                .filter(|cached| cached.fetched_at.elapsed() < self.ttl);
            if let Some(jwk) = fresh.and_then(|cached| cached.keys.find(kid)) {
                return key_from_jwk(jwk);
            }
        }

        let keys = self.refresh(kid).await?;
        match keys.find(kid) {
            Some(jwk) => key_from_jwk(jwk),
            None => Err(AskaiError::unauthenticated(format!(
                "no signing key with kid `{kid}`"
            ))),
        }
    }

    async fn refresh(&self, kid: &str) -> Result<JwkSet, AskaiError> {
        let mut state = self.state.write().await;
        if let Some(cached) = state.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < self.ttl && (age < self.min_refresh || cached.keys.find(kid).is_some()) {
                debug!(kid, age_ms = age.as_millis() as u64, "reusing recently fetched signing keys");
                return Ok(cached.keys.clone());
            }
        }
        debug!(url = %self.url, "fetching signing keys");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!(error = %e, "signing key fetch failed");
            AskaiError::unauthenticated(format!("signing key fetch failed: {e}"))
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "signing key endpoint returned an error");
            return Err(AskaiError::unauthenticated(format!(
                "signing key endpoint returned {status}"
            )));
        }
        let keys: JwkSet = response.json().await.map_err(|e| {
            AskaiError::unauthenticated(format!("malformed signing key document: {e}"))
        })?;

        *state = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }
}

fn key_from_jwk(jwk: &jsonwebtoken::jwk::Jwk) -> Result<DecodingKey, AskaiError> {
    DecodingKey::from_jwk(jwk)
        .map_err(|e| AskaiError::unauthenticated(format!("unusable signing key: {e}")))
}

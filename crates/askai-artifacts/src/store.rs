// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! S3 object upload returning the object's public URL.

use askai_config::model::ArtifactsConfig;
use askai_core::types::{AdapterType, HealthStatus};
use askai_core::{ArtifactStore, AskaiError, PluginAdapter};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use crate::sigv4::{self, Credentials};

struct AccessKey {
    id: String,
    secret: SecretString,
}

/// Uploads artifacts with signed `PUT Object` requests.
///
/// Without an `endpoint`, requests go to AWS virtual-hosted addresses
/// (`https://<bucket>.s3.<region>.amazonaws.com/<key>`). With one, they use
/// path-style addressing (`<endpoint>/<bucket>/<key>`).
pub struct S3ArtifactStore {
    http: reqwest::Client,
    bucket: String,
    region: String,
    access_key: Option<AccessKey>,
    endpoint: Option<Url>,
    public_base_url: Option<String>,
}

impl S3ArtifactStore {
    pub fn new(config: &ArtifactsConfig, http: reqwest::Client) -> Result<Self, AskaiError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| AskaiError::Config(format!("invalid artifacts.endpoint: {e}")))?;

        let access_key = match (&config.access_key_id, &config.secret_access_key) {
            (Some(id), Some(secret)) => Some(AccessKey {
                id: id.clone(),
                secret: SecretString::from(secret.clone()),
            }),
            _ => None,
        };

        Ok(Self {
            http,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            access_key,
            endpoint,
            public_base_url: config
                .public_base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    /// Object key for an owner's artifact.
    pub fn object_key(owner_email: &str, key_suffix: &str) -> String {
        format!("{owner_email}/{key_suffix}")
    }

    /// The address persisted in records for `key`.
    pub fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{base}/{key}"),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{key}",
                self.bucket, self.region
            ),
        }
    }

    /// Request URL and the canonical URI it is signed with.
    fn target(&self, key: &str) -> Result<(Url, String), AskaiError> {
        let encoded = sigv4::encode_key(key);
        let (raw, canonical_uri) = match &self.endpoint {
            Some(endpoint) => {
                let canonical_uri = format!(
                    "{}/{}/{encoded}",
                    endpoint.path().trim_end_matches('/'),
                    sigv4::encode_key(&self.bucket)
                );
                let mut origin = endpoint.clone();
                origin.set_path("");
                let origin = origin.as_str().trim_end_matches('/').to_string();
                (format!("{origin}{canonical_uri}"), canonical_uri)
            }
            None => {
                let canonical_uri = format!("/{encoded}");
                (
                    format!(
                        "https://{}.s3.{}.amazonaws.com{canonical_uri}",
                        self.bucket, self.region
                    ),
                    canonical_uri,
                )
            }
        };
        let url = Url::parse(&raw)
            .map_err(|e| AskaiError::artifact(format!("invalid object URL {raw}: {e}")))?;
        Ok((url, canonical_uri))
    }
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(
        &self,
        owner_email: &str,
        key_suffix: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AskaiError> {
        let access_key = self
            .access_key
            .as_ref()
            .ok_or_else(|| AskaiError::artifact("object store credentials are not configured"))?;

        let key = Self::object_key(owner_email, key_suffix);
        let (url, canonical_uri) = self.target(&key)?;
        let credentials = Credentials {
            access_key_id: &access_key.id,
            secret_access_key: access_key.secret.expose_secret(),
            region: &self.region,
        };
        let signed = sigv4::sign(
            &credentials,
            "PUT",
            &host_header(&url),
            &canonical_uri,
            content_type,
            &bytes,
            Utc::now(),
        )
        .map_err(|e| AskaiError::Artifact {
            message: format!("request signing failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let size = bytes.len();
        let response = self
            .http
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.content_sha256)
            .header(reqwest::header::AUTHORIZATION, &signed.authorization)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AskaiError::Artifact {
                message: format!("upload of {key} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(key = %key, status = %status, "object store rejected upload");
            return Err(AskaiError::artifact(format!(
                "upload of {key} returned {status}: {body}"
            )));
        }

        debug!(key = %key, size, "artifact uploaded");
        Ok(self.public_url(&key))
    }
}

#[async_trait]
impl PluginAdapter for S3ArtifactStore {
    fn name(&self) -> &str {
        "s3"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ArtifactStore
    }

    async fn health_check(&self) -> Result<HealthStatus, AskaiError> {
        Ok(match self.access_key {
            Some(_) => HealthStatus::Healthy,
            None => HealthStatus::Unhealthy("artifacts credentials are not set".into()),
        })
    }
}

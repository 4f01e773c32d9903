// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity-token verification and bot-check traits.

use async_trait::async_trait;

use crate::error::AskaiError;
use crate::types::Principal;

const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the raw token from an `Authorization` header value.
///
/// Fails with [`AskaiError::Unauthenticated`] when the header is missing or is
/// not `Bearer `-prefixed.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AskaiError> {
    let header = header.ok_or_else(|| AskaiError::unauthenticated("missing authorization header"))?;
    header
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AskaiError::unauthenticated("authorization header is not a bearer credential"))
}

/// Validates identity-provider tokens and resolves them to a [`Principal`].
///
/// Verification runs on every request; implementations keep no session state.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Validates signature, issuer, audience and expiry of a raw token.
    async fn verify(&self, token: &str) -> Result<Principal, AskaiError>;

    /// Validates an `Authorization` header value.
    async fn verify_header(&self, header: Option<&str>) -> Result<Principal, AskaiError> {
        let token = bearer_token(header)?;
        self.verify(token).await
    }
}

/// Challenge-response gate in front of the login flow.
#[async_trait]
pub trait BotCheck: Send + Sync {
    /// Returns `true` only when the verification service accepts the token.
    ///
    /// Never fails: transport errors and rejections both yield `false`.
    async fn check(&self, challenge_token: &str) -> bool;
}

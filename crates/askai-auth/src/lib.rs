// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity verification for the askai backend.
//!
//! [`GoogleTokenVerifier`] checks Google-issued ID tokens against a cached
//! JWKS; [`RecaptchaGate`] guards the login flow with a bot check.

pub mod google;
pub mod jwks;
pub mod recaptcha;

#[cfg(test)]
mod testkeys;

pub use google::GoogleTokenVerifier;
pub use jwks::JwksCache;
pub use recaptcha::RecaptchaGate;

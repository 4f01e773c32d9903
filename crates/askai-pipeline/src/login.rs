// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login verification: bot check first, then the identity token.

use std::sync::Arc;

use askai_core::{AskaiError, BotCheck, TokenVerifier};
use tracing::{info, warn};

use crate::request::{LoginRequest, LoginResponse, LoginUser};

pub struct LoginVerifier {
    bot_check: Arc<dyn BotCheck>,
    verifier: Arc<dyn TokenVerifier>,
}

impl LoginVerifier {
    pub fn new(bot_check: Arc<dyn BotCheck>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            bot_check,
            verifier,
        }
    }

    /// A failed bot check ends the flow before the identity token is looked at.
    pub async fn verify(&self, request: LoginRequest) -> Result<LoginResponse, AskaiError> {
        if !self.bot_check.check(&request.recaptcha_token).await {
            warn!("login refused by bot check");
            return Err(AskaiError::BotCheckFailed);
        }

        let principal = self.verifier.verify(&request.google_token).await?;
        info!(email = %principal.email, "login verified");
        Ok(LoginResponse {
            success: true,
            message: "Login successful".into(),
            user: LoginUser {
                email: principal.email,
                name: principal.name,
            },
        })
    }
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the askai backend.
//!
//! Routes:
//! - `GET /` health probe
//! - `POST /verify-login`
//! - `POST` and `GET` on `/chats/`, `/images/`, `/videos/`

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, build_cors_layer, build_router, serve};

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation-and-persistence pipeline for the askai backend.
//!
//! [`GenerationPipeline`] orchestrates identity, provider, artifact store and
//! record store for the three exchange kinds; [`LoginVerifier`] runs the
//! login check. Both hold their collaborators as trait objects so tests can
//! swap any of them for a fake.

pub mod keys;
pub mod login;
pub mod pipeline;
pub mod request;

pub use login::LoginVerifier;
pub use pipeline::GenerationPipeline;
pub use request::{ChatRequest, ImageRequest, LoginRequest, LoginResponse, LoginUser, VideoRequest};

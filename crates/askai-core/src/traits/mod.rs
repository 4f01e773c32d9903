// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for every external system the pipeline talks to.
//!
//! All traits use `#[async_trait]` so the pipeline can hold them as
//! `Arc<dyn Trait>` and tests can substitute fakes.

pub mod adapter;
pub mod artifact;
pub mod identity;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use artifact::ArtifactStore;
pub use identity::{BotCheck, TokenVerifier, bearer_token};
pub use provider::{GenerationProvider, ProviderConnector};
pub use storage::RecordStore;

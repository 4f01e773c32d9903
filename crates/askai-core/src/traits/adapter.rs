// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait for long-lived backend components.

use async_trait::async_trait;

use crate::error::AskaiError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and health reporting shared by the process-lifetime adapters
/// (record store, artifact store).
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns which external seam this adapter implements.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, AskaiError>;
}

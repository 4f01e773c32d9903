// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for askai integration tests.
//!
//! # Components
//!
//! - [`fakes`] - counting fakes for the identity provider, bot check,
//!   generation provider and artifact store
//! - [`TestHarness`] - the real pipeline over those fakes and a temp SQLite
//!   record store

pub mod fakes;
pub mod harness;

pub use fakes::{
    FixedBotCheck, MemoryArtifactStore, Script, ScriptedConnector, StaticTokenVerifier,
    SwitchableRecordStore,
};
pub use harness::{
    OTHER_EMAIL, OTHER_TOKEN, OWNER_EMAIL, OWNER_TOKEN, TestHarness, TestHarnessBuilder,
};

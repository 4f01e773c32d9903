// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifact storage for generated images and videos.
//!
//! Objects are keyed `<owner_email>/<suffix>` and uploaded with SigV4-signed
//! `PUT` requests; the store hands back the public URL that gets persisted.

pub mod sigv4;
pub mod store;

pub use store::S3ArtifactStore;

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules.
//!
//! Every function takes a [`Database`](crate::Database) and runs through its
//! single tokio-rusqlite connection.

pub mod exchanges;

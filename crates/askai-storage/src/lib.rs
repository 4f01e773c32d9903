// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite record store for the askai backend.
//!
//! One append-only table per exchange kind (`chats`, `images`, `videos`),
//! embedded migrations, and a single-writer connection via `tokio-rusqlite`.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;

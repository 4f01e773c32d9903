// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements run on tokio-rusqlite's single background thread, so
//! writes are serialized. Do NOT open additional connections for writes.

use askai_core::AskaiError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into `AskaiError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> AskaiError {
    AskaiError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and applies
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, AskaiError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| AskaiError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e: tokio_rusqlite::Error<refinery::Error>| AskaiError::Storage {
                source: format!("migration failed: {e}").into(),
            })?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Folds the WAL back into the main database file.
    pub async fn checkpoint(&self) -> Result<(), AskaiError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Insert and date-window queries shared by the three exchange tables.

use askai_core::types::{DateRange, ExchangeKind, NewExchange};
use askai_core::AskaiError;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{Database, map_tr_err};

/// Column layout of one exchange table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeTable {
    pub name: &'static str,
    pub prompt_column: &'static str,
    pub output_column: &'static str,
}

impl ExchangeTable {
    pub fn for_kind(kind: ExchangeKind) -> Self {
        match kind {
            ExchangeKind::Text => Self {
                name: "chats",
                prompt_column: "question",
                output_column: "answer",
            },
            ExchangeKind::Image => Self {
                name: "images",
                prompt_column: "description",
                output_column: "image",
            },
            ExchangeKind::Video => Self {
                name: "videos",
                prompt_column: "content",
                output_column: "video",
            },
        }
    }
}

/// A persisted row, before it is shaped into a kind-specific record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRow {
    pub id: i64,
    pub owner_email: String,
    pub model_id: String,
    pub prompt: String,
    pub output: String,
    pub created_at: DateTime<Utc>,
}

/// Stored timestamp format; fixed width, so text order is time order.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Smallest and largest values [`format_timestamp`] yields for years 0..=9999.
const EARLIEST_KEY: &str = "0000-01-01T00:00:00.000Z";
const LATEST_KEY: &str = "9999-12-31T23:59:59.999Z";

/// Inclusive lower bound as a column key. Years outside 0..=9999 format with
/// a sign and extra digits, which breaks text order, so they are clamped.
fn lower_key(ts: DateTime<Utc>) -> Option<String> {
    match ts.year() {
        y if y < 0 => None,
        y if y > 9999 => Some(LATEST_KEY.to_string()),
        _ => Some(format_timestamp(ts)),
    }
}

/// Exclusive upper bound as a column key, clamped like [`lower_key`].
fn upper_key(ts: DateTime<Utc>) -> Option<String> {
    match ts.year() {
        y if y < 0 => Some(EARLIEST_KEY.to_string()),
        y if y > 9999 => None,
        _ => Some(format_timestamp(ts)),
    }
}

fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Appends a record and returns it with its assigned id and timestamp.
///
/// The timestamp never goes backwards within a table: if the wall clock
/// reads earlier than the newest stored row, the newer value is reused.
pub async fn insert_exchange(
    db: &Database,
    kind: ExchangeKind,
    record: NewExchange,
) -> Result<ExchangeRow, AskaiError> {
    let table = ExchangeTable::for_kind(kind);
    db.connection()
        .call(move |conn| -> Result<ExchangeRow, rusqlite::Error> {
            let tx = conn.transaction()?;
            let newest: Option<String> = tx.query_row(
                &format!("SELECT MAX(date) FROM {}", table.name),
                [],
                |row| row.get(0),
            )?;
            let now = format_timestamp(Utc::now());
            let date = match newest {
                Some(newest) if newest > now => newest,
                _ => now,
            };

            tx.execute(
                &format!(
                    "INSERT INTO {} (email, model, {}, {}, date) VALUES (?1, ?2, ?3, ?4, ?5)",
                    table.name, table.prompt_column, table.output_column
                ),
                params![
                    record.owner_email,
                    record.model_id,
                    record.prompt,
                    record.output,
                    date
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;

            Ok(ExchangeRow {
                id,
                owner_email: record.owner_email,
                model_id: record.model_id,
                prompt: record.prompt,
                output: record.output,
                created_at: parse_timestamp(5, &date)?,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Returns an owner's records inside `range`, newest first.
///
/// Rows with equal timestamps come back in reverse insertion order.
pub async fn query_exchanges(
    db: &Database,
    kind: ExchangeKind,
    owner_email: &str,
    range: DateRange,
) -> Result<Vec<ExchangeRow>, AskaiError> {
    let table = ExchangeTable::for_kind(kind);
    let owner_email = owner_email.to_string();
    let lower = range.lower_bound().and_then(lower_key);
    let upper = range.upper_bound().and_then(upper_key);

    db.connection()
        .call(move |conn| -> Result<Vec<ExchangeRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, email, model, {}, {}, date FROM {}
                 WHERE email = ?1
                   AND (?2 IS NULL OR date >= ?2)
                   AND (?3 IS NULL OR date < ?3)
                 ORDER BY date DESC, id DESC",
                table.prompt_column, table.output_column, table.name
            ))?;
            let rows = stmt.query_map(params![owner_email, lower, upper], |row| {
                let date: String = row.get(5)?;
                Ok(ExchangeRow {
                    id: row.get(0)?,
                    owner_email: row.get(1)?,
                    model_id: row.get(2)?,
                    prompt: row.get(3)?,
                    output: row.get(4)?,
                    created_at: parse_timestamp(5, &date)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report persistence operations.
//!
//! The reports table is append-only: rows are inserted one at a time by
//! `insert_report` and only ever removed wholesale by `clear_reports`.

use ombuds_core::{OmbudsError, SubmissionRecord};
use rusqlite::params;

use crate::database::Database;

/// Append one submission record.
pub async fn insert_report(db: &Database, record: &SubmissionRecord) -> Result<(), OmbudsError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO reports (user_id, category, name, contact, message, is_secret, submitted_at, username)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.user_id,
                    record.category,
                    record.name,
                    record.contact,
                    record.message,
                    record.is_secret,
                    record.submitted_at,
                    record.username,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load all submission records in insertion order.
pub async fn list_reports(db: &Database) -> Result<Vec<SubmissionRecord>, OmbudsError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, category, name, contact, message, is_secret, submitted_at, username
                 FROM reports ORDER BY id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(SubmissionRecord {
                    user_id: row.get(0)?,
                    category: row.get(1)?,
                    name: row.get(2)?,
                    contact: row.get(3)?,
                    message: row.get(4)?,
                    is_secret: row.get(5)?,
                    submitted_at: row.get(6)?,
                    username: row.get(7)?,
                })
            })?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete every submission record. Returns how many rows were removed.
pub async fn clear_reports(db: &Database) -> Result<usize, OmbudsError> {
    db.connection()
        .call(|conn| {
            let n = conn.execute("DELETE FROM reports", [])?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

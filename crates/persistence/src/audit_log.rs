// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The audit-log read path.
//!
//! Writes go through the trailing audit step of mutation plans; this
//! module only reads entries back, newest first, one fixed-size page
//! at a time.

use mela_audit::AuditEntry;
use rusqlite::{Connection, params};

use crate::error::StoreError;

/// Entries per audit page.
pub const AUDIT_PAGE_SIZE: usize = 20;

/// Lists one page of audit entries, newest first by entry id.
///
/// `page` is zero-based. A page past the end is empty, not an error.
///
/// # Errors
///
/// Returns an error if the query fails or a stored snapshot is not
/// valid JSON.
pub fn list_audit_page(conn: &Connection, page: usize) -> Result<Vec<AuditEntry>, StoreError> {
    let limit = i64::try_from(AUDIT_PAGE_SIZE)
        .map_err(|err| StoreError::Unknown(err.to_string()))?;
    let offset = i64::try_from(page.saturating_mul(AUDIT_PAGE_SIZE))
        .map_err(|err| StoreError::Unknown(err.to_string()))?;

    let mut stmt = conn.prepare(
        "SELECT id, actor_id, action, old_value, new_value, created_at \
         FROM audit_log ORDER BY id DESC LIMIT ?1 OFFSET ?2",
    )?;

    let rows = stmt.query_map(params![limit, offset], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, Option<i64>>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, actor_id, action, old_value, new_value, created_at) = row?;
        entries.push(AuditEntry {
            id,
            actor_id,
            action,
            old_value: parse_snapshot(old_value)?,
            new_value: parse_snapshot(new_value)?,
            created_at,
        });
    }
    Ok(entries)
}

fn parse_snapshot(stored: Option<String>) -> Result<Option<serde_json::Value>, StoreError> {
    stored
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(StoreError::from)
}

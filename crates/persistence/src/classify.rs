// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Post-rollback classification of execution failures.
//!
//! The executor surfaces raw driver errors; this module turns the
//! recognizable constraint violations into client-facing errors and
//! keeps everything else opaque. SQLite reports a foreign-key
//! violation without naming the constraint, so after the rollback the
//! classifier probes: on insert/update, each foreign-key parent from
//! the descriptor, to find which reference is dangling; on delete,
//! each foreign key in the registry pointing at the deleted table, to
//! find which dependent still holds the row.

use mela_domain::{FieldValue, Record, ResourceDescriptor, ResourceKind, descriptor};
use rusqlite::{Connection, OptionalExtension, ffi, params};
use tracing::error;

use crate::error::{ClientError, StoreError};
use crate::executor::ExecuteError;

/// Classifies a failed add or edit.
///
/// `record` is the field set that was being written; its foreign-key
/// values drive the parent probes.
#[must_use]
pub fn classify_mutation_failure(
    conn: &Connection,
    descriptor: &ResourceDescriptor,
    record: &Record,
    err: &ExecuteError,
) -> StoreError {
    match extended_code(err) {
        Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
            if let Some(field) = probe_missing_parent(conn, descriptor, record) {
                return StoreError::Client(ClientError::MissingReference { field });
            }
            opaque(descriptor, err)
        }
        Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
            if let Some(field) = descriptor.unique_field {
                let value = match record.get(field) {
                    Some(FieldValue::Text(v)) => v.clone(),
                    Some(other) => other.to_json().to_string(),
                    None => String::new(),
                };
                return StoreError::Client(ClientError::Duplicate {
                    field: field.to_string(),
                    value,
                });
            }
            opaque(descriptor, err)
        }
        _ => opaque(descriptor, err),
    }
}

/// Classifies a failed delete.
///
/// A foreign-key violation on delete means dependents still reference
/// the row. The registry knows every table that references this one,
/// so the probe names the actual dependent (a venue may be held by
/// rooms, events, or pro shows). When no dependent row turns up the
/// violation did not come from the domain DELETE, and it stays
/// opaque.
#[must_use]
pub fn classify_delete_failure(
    conn: &Connection,
    descriptor: &ResourceDescriptor,
    id: i64,
    err: &ExecuteError,
) -> StoreError {
    if extended_code(err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
        if let Some(dependent) = probe_dependent(conn, descriptor.table, id) {
            return StoreError::Client(ClientError::InUse {
                message: format!(
                    "{} is being used by one or more {dependent}",
                    descriptor.kind.display_name()
                ),
            });
        }
    }
    opaque(descriptor, err)
}

fn extended_code(err: &ExecuteError) -> Option<i32> {
    if let ExecuteError::Sqlite(rusqlite::Error::SqliteFailure(failure, _)) = err {
        Some(failure.extended_code)
    } else {
        None
    }
}

/// Finds the first foreign-key column whose referenced parent row
/// does not exist. Returns `None` when every parent checks out, which
/// means the violation came from somewhere this probe cannot see.
fn probe_missing_parent(
    conn: &Connection,
    descriptor: &ResourceDescriptor,
    record: &Record,
) -> Option<String> {
    for fk in descriptor.foreign_keys {
        let Some(FieldValue::Integer(id)) = record.get(fk.column) else {
            continue;
        };

        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", fk.parent_table);
        let exists = conn
            .query_row(&sql, params![id], |_| Ok(()))
            .optional()
            .ok()?;
        if exists.is_none() {
            return Some(fk.column.to_string());
        }
    }
    None
}

/// Finds the first resource table with a row still referencing the
/// deleted one, walking every foreign key in the registry that points
/// at `table`.
fn probe_dependent(conn: &Connection, table: &str, id: i64) -> Option<&'static str> {
    for kind in ResourceKind::ALL {
        let child = descriptor(kind);
        for fk in child.foreign_keys {
            if fk.parent_table != table {
                continue;
            }

            let sql = format!(
                "SELECT 1 FROM {} WHERE {} = ?1 LIMIT 1",
                child.table, fk.column
            );
            if let Ok(Some(())) = conn.query_row(&sql, params![id], |_| Ok(())).optional() {
                return Some(child.table);
            }
        }
    }
    None
}

fn opaque(descriptor: &ResourceDescriptor, err: &ExecuteError) -> StoreError {
    error!(
        kind = descriptor.kind.as_str(),
        error = %err,
        "Unclassified store failure"
    );
    StoreError::Unknown(err.to_string())
}

// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sequential, atomic execution of mutation plans.
//!
//! A plan runs inside a single transaction. Steps execute strictly in
//! order; any failure rolls back the whole transaction, including
//! already-executed steps, and surfaces the raw driver error to the
//! caller. Classification into client-facing errors happens one layer
//! up, after the rollback.

use mela_core::{MutationPlan, Param, PlanError};
use mela_domain::{FieldValue, Record};
use rusqlite::{Connection, Transaction, params_from_iter, types::Value};
use tracing::debug;

/// What one executed step produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepOutcome {
    /// Rows changed by a write step.
    pub rows_affected: usize,
    /// The insert-identity after a write step, for `GeneratedId`
    /// resolution by later steps.
    pub generated_id: Option<i64>,
    /// Rows collected by a fetch step.
    pub rows: Vec<Record>,
}

/// Why a plan execution failed.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// The plan violated a structural invariant.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// A step referenced the generated id of a step that produced
    /// none (a fetch step).
    #[error("step {step} references step {referenced}, which generated no row id")]
    MissingGeneratedId {
        /// The referencing step index.
        step: usize,
        /// The referenced step index.
        referenced: usize,
    },
    /// A statement failed; the transaction was rolled back.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Executes a mutation plan atomically.
///
/// Validates the plan, opens a transaction, runs every step in order,
/// and commits. On any step failure the transaction is rolled back
/// before the error is returned, so a failed plan leaves no visible
/// effect.
///
/// # Errors
///
/// Returns an error if the plan is structurally invalid, a step
/// references a step without a generated id, or any statement fails.
pub fn execute_plan(
    conn: &mut Connection,
    plan: &MutationPlan,
) -> Result<Vec<StepOutcome>, ExecuteError> {
    plan.validate()?;

    let tx = conn.transaction().map_err(ExecuteError::Sqlite)?;
    match run_steps(&tx, plan) {
        Ok(outcomes) => {
            tx.commit().map_err(ExecuteError::Sqlite)?;
            Ok(outcomes)
        }
        Err(err) => {
            tx.rollback().map_err(ExecuteError::Sqlite)?;
            Err(err)
        }
    }
}

fn run_steps(tx: &Transaction<'_>, plan: &MutationPlan) -> Result<Vec<StepOutcome>, ExecuteError> {
    let mut outcomes: Vec<StepOutcome> = Vec::with_capacity(plan.len());

    for (index, step) in plan.steps().iter().enumerate() {
        let params = resolve_params(index, &step.params, &outcomes)?;

        if step.fetch {
            let mut stmt = tx.prepare(&step.sql).map_err(ExecuteError::Sqlite)?;
            let names: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();
            let mut rows = stmt
                .query(params_from_iter(params))
                .map_err(ExecuteError::Sqlite)?;

            let mut records: Vec<Record> = Vec::new();
            while let Some(row) = rows.next().map_err(ExecuteError::Sqlite)? {
                records.push(row_to_record(&names, row)?);
            }

            outcomes.push(StepOutcome {
                rows_affected: 0,
                generated_id: None,
                rows: records,
            });
        } else {
            let rows_affected = tx
                .execute(&step.sql, params_from_iter(params))
                .map_err(ExecuteError::Sqlite)?;
            debug!(step = index, rows_affected, "Executed mutation step");

            outcomes.push(StepOutcome {
                rows_affected,
                generated_id: Some(tx.last_insert_rowid()),
                rows: Vec::new(),
            });
        }
    }

    Ok(outcomes)
}

/// Resolves step parameters against earlier outcomes.
fn resolve_params(
    index: usize,
    params: &[Param],
    outcomes: &[StepOutcome],
) -> Result<Vec<Value>, ExecuteError> {
    params
        .iter()
        .map(|param| match param {
            Param::Value(value) => Ok(to_sql_value(value)),
            Param::GeneratedId(referenced) => outcomes
                .get(*referenced)
                .and_then(|outcome| outcome.generated_id)
                .map(Value::Integer)
                .ok_or(ExecuteError::MissingGeneratedId {
                    step: index,
                    referenced: *referenced,
                }),
        })
        .collect()
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(v) => Value::Integer(*v),
        FieldValue::Real(v) => Value::Real(*v),
        FieldValue::Text(v) => Value::Text(v.clone()),
    }
}

/// Converts a stored SQL value back into a field value.
///
/// The schema stores no blobs; a blob read back maps to null rather
/// than inventing a field shape the domain does not have.
pub(crate) fn from_sql_value(value: Value) -> FieldValue {
    match value {
        Value::Null | Value::Blob(_) => FieldValue::Null,
        Value::Integer(v) => FieldValue::Integer(v),
        Value::Real(v) => FieldValue::Real(v),
        Value::Text(v) => FieldValue::Text(v),
    }
}

pub(crate) fn row_to_record(
    names: &[String],
    row: &rusqlite::Row<'_>,
) -> Result<Record, ExecuteError> {
    let mut record = Record::new();
    for (index, name) in names.iter().enumerate() {
        let value: Value = row.get(index).map_err(ExecuteError::Sqlite)?;
        record.set(name, from_sql_value(value));
    }
    Ok(record)
}

// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Descriptor-driven construction of mutation plans.
//!
//! One builder per operation shape, shared by all resource types.
//! The add and edit builders follow the same skeleton: an optional
//! image-insert step first, then the domain statement (whose image
//! parameter is either the existing image's id or a reference to the
//! just-inserted image step), then an optional denormalized read-back,
//! then the audit step — always last, so the audit record commits with
//! its mutation or not at all.

use mela_audit::AuditAction;
use mela_domain::{FieldValue, Record, ResourceDescriptor};
use serde_json::Value;

use crate::plan::{MutationPlan, MutationStep, Param};

/// The resolved image situation for one mutation, as reported by the
/// image identity resolver before plan construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ImagePlan {
    /// The mutation carries no image.
    Absent,
    /// The identifier already has a stored row; reuse its id.
    Existing(i64),
    /// No row exists for this identifier yet; the plan must insert
    /// one and reference its generated id.
    New(String),
}

/// The ingredients of the trailing audit step.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditSpec {
    /// The acting user's id. `None` when the mutation removes the
    /// actor's own row: the entry then starts with a null actor,
    /// the same state actor deletion would leave it in anyway.
    pub actor_id: Option<i64>,
    /// What was done, to which resource type.
    pub action: AuditAction,
    /// Entity snapshot before the mutation. Absent for adds.
    pub old_value: Option<Value>,
    /// Entity snapshot after the mutation. Absent for deletes.
    pub new_value: Option<Value>,
}

const AUDIT_INSERT_SQL: &str =
    "INSERT INTO audit_log (actor_id, action, old_value, new_value) VALUES (?1, ?2, ?3, ?4)";

const IMAGE_INSERT_SQL: &str = "INSERT INTO images (identifier) VALUES (?1)";

/// Builds the audit step for a mutating plan.
///
/// Pure plan construction, no I/O. Snapshots are serialized to their
/// compact JSON form; the log stores them opaquely.
#[must_use]
pub fn audit_step(spec: &AuditSpec) -> MutationStep {
    let snapshot_param = |value: &Option<Value>| {
        value.as_ref().map_or(Param::Value(FieldValue::Null), |v| {
            Param::Value(FieldValue::Text(v.to_string()))
        })
    };

    MutationStep::new(
        AUDIT_INSERT_SQL.to_string(),
        vec![
            spec.actor_id
                .map_or(Param::Value(FieldValue::Null), |id| {
                    Param::Value(FieldValue::Integer(id))
                }),
            Param::Value(FieldValue::Text(spec.action.label())),
            snapshot_param(&spec.old_value),
            snapshot_param(&spec.new_value),
        ],
    )
}

/// Builds the plan for adding a resource.
///
/// `record` holds the validated scalar fields; `image` is the resolved
/// image situation; `audit` is the trailing audit step's ingredients.
#[must_use]
pub fn build_add(
    descriptor: &ResourceDescriptor,
    record: &Record,
    image: &ImagePlan,
    audit: Option<&AuditSpec>,
) -> MutationPlan {
    let mut plan = MutationPlan::new();

    let image_step = push_image_step(&mut plan, image);
    let insert_index = plan.len();
    plan.push(insert_step(descriptor, record, image, image_step));

    if let Some(sql) = descriptor.read_back {
        plan.push(MutationStep::fetch(
            sql.to_string(),
            vec![Param::GeneratedId(insert_index)],
        ));
    }

    if let Some(spec) = audit {
        plan.push(audit_step(spec));
    }

    plan
}

/// Builds the plan for editing a resource, keyed by id.
///
/// `merged` is the result of [`crate::merge_patch`]; callers must
/// have already established through [`crate::diff`] that the edit is
/// not a no-op.
#[must_use]
pub fn build_edit(
    descriptor: &ResourceDescriptor,
    id: i64,
    merged: &Record,
    image: &ImagePlan,
    audit: Option<&AuditSpec>,
) -> MutationPlan {
    let mut plan = MutationPlan::new();

    let image_step = push_image_step(&mut plan, image);
    plan.push(update_step(descriptor, id, merged, image, image_step));

    if let Some(sql) = descriptor.read_back {
        plan.push(MutationStep::fetch(
            sql.to_string(),
            vec![Param::Value(FieldValue::Integer(id))],
        ));
    }

    if let Some(spec) = audit {
        plan.push(audit_step(spec));
    }

    plan
}

/// Builds the plan for deleting a resource: one DELETE plus the audit
/// step.
#[must_use]
pub fn build_delete(
    descriptor: &ResourceDescriptor,
    id: i64,
    audit: Option<&AuditSpec>,
) -> MutationPlan {
    let mut plan = MutationPlan::new();

    plan.push(MutationStep::new(
        format!("DELETE FROM {} WHERE id = ?1", descriptor.table),
        vec![Param::Value(FieldValue::Integer(id))],
    ));

    if let Some(spec) = audit {
        plan.push(audit_step(spec));
    }

    plan
}

/// Generates the plain read path query for one row.
///
/// Image-bearing resources join the image table so the record exposes
/// the content-derived identifier under `image` rather than the raw
/// foreign key. Read paths bypass the plan machinery entirely.
#[must_use]
pub fn select_by_id_sql(descriptor: &ResourceDescriptor) -> String {
    format!(
        "{} WHERE {}.id = ?1",
        select_prefix(descriptor),
        descriptor.table
    )
}

/// Generates the plain read path query for all rows, ordered by id.
#[must_use]
pub fn select_all_sql(descriptor: &ResourceDescriptor) -> String {
    format!(
        "{} ORDER BY {}.id",
        select_prefix(descriptor),
        descriptor.table
    )
}

fn select_prefix(descriptor: &ResourceDescriptor) -> String {
    let table = descriptor.table;
    let mut columns: Vec<String> = Vec::with_capacity(descriptor.columns.len() + 2);
    columns.push(format!("{table}.id"));
    for column in descriptor.columns {
        columns.push(format!("{table}.{}", column.name));
    }

    if let Some(image_column) = descriptor.image_column {
        columns.push("images.identifier AS image".to_string());
        format!(
            "SELECT {} FROM {table} LEFT JOIN images ON images.id = {table}.{image_column}",
            columns.join(", ")
        )
    } else {
        format!("SELECT {} FROM {table}", columns.join(", "))
    }
}

/// Pushes the image-insert step when the plan needs one, returning its
/// index.
fn push_image_step(plan: &mut MutationPlan, image: &ImagePlan) -> Option<usize> {
    match image {
        ImagePlan::New(identifier) => {
            let index = plan.len();
            plan.push(MutationStep::new(
                IMAGE_INSERT_SQL.to_string(),
                vec![Param::Value(FieldValue::Text(identifier.clone()))],
            ));
            Some(index)
        }
        ImagePlan::Absent | ImagePlan::Existing(_) => None,
    }
}

/// The image foreign-key parameter: the existing row's id, or the
/// just-inserted image step's generated identity.
fn image_param(image: &ImagePlan, image_step: Option<usize>) -> Param {
    match (image, image_step) {
        (ImagePlan::Existing(id), _) => Param::Value(FieldValue::Integer(*id)),
        (ImagePlan::New(_), Some(index)) => Param::GeneratedId(index),
        _ => Param::Value(FieldValue::Null),
    }
}

fn insert_step(
    descriptor: &ResourceDescriptor,
    record: &Record,
    image: &ImagePlan,
    image_step: Option<usize>,
) -> MutationStep {
    let mut names: Vec<&str> = descriptor.columns.iter().map(|c| c.name).collect();
    let mut params: Vec<Param> = descriptor
        .columns
        .iter()
        .map(|column| {
            Param::Value(
                record
                    .get(column.name)
                    .cloned()
                    .unwrap_or(FieldValue::Null),
            )
        })
        .collect();

    if let Some(image_column) = descriptor.image_column {
        names.push(image_column);
        params.push(image_param(image, image_step));
    }

    let placeholders: Vec<String> = (1..=names.len()).map(|n| format!("?{n}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        descriptor.table,
        names.join(", "),
        placeholders.join(", ")
    );

    MutationStep::new(sql, params)
}

fn update_step(
    descriptor: &ResourceDescriptor,
    id: i64,
    merged: &Record,
    image: &ImagePlan,
    image_step: Option<usize>,
) -> MutationStep {
    let mut assignments: Vec<String> = Vec::with_capacity(descriptor.columns.len() + 1);
    let mut params: Vec<Param> = Vec::with_capacity(descriptor.columns.len() + 2);

    for column in descriptor.columns {
        assignments.push(format!("{} = ?{}", column.name, assignments.len() + 1));
        params.push(Param::Value(
            merged
                .get(column.name)
                .cloned()
                .unwrap_or(FieldValue::Null),
        ));
    }

    if let Some(image_column) = descriptor.image_column {
        assignments.push(format!("{image_column} = ?{}", assignments.len() + 1));
        params.push(image_param(image, image_step));
    }

    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        descriptor.table,
        assignments.join(", "),
        assignments.len() + 1
    );
    params.push(Param::Value(FieldValue::Integer(id)));

    MutationStep::new(sql, params)
}

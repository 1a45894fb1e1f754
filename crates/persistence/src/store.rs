// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The store adapter tying the pure mutation machinery to SQLite.
//!
//! One store, one connection. Mutations resolve their image identity,
//! build a plan, execute it atomically, and classify any failure
//! after the rollback. Read paths bypass the plan machinery and query
//! directly.

use std::path::Path;

use mela_audit::{AuditAction, AuditEntry, Operation};
use mela_core::{
    AuditSpec, ImagePlan, build_add, build_delete, build_edit, diff, merge_patch, select_all_sql,
    select_by_id_sql,
};
use mela_domain::{
    FieldValue, NewResource, Patch, Record, ResourceDescriptor, ResourceKind, descriptor,
};
use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::audit_log;
use crate::classify::{classify_delete_failure, classify_mutation_failure};
use crate::error::{ClientError, StoreError};
use crate::executor::{StepOutcome, execute_plan, row_to_record};
use crate::image::resolve_image_plan;
use crate::schema;

/// The CMS resource store.
pub struct CmsStore {
    pub(crate) conn: Connection,
}

impl CmsStore {
    /// Opens an in-memory store with a fresh schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be initialized or
    /// foreign key enforcement is not active.
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::initialize_schema(&conn)?;
        schema::verify_foreign_key_enforcement(&conn)?;
        Ok(Self { conn })
    }

    /// Opens a file-backed store, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, the schema
    /// cannot be initialized, or foreign key enforcement is not
    /// active.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        schema::enable_wal_mode(&conn)?;
        schema::initialize_schema(&conn)?;
        schema::verify_foreign_key_enforcement(&conn)?;
        Ok(Self { conn })
    }

    /// Seeds the first user without an audit entry.
    ///
    /// Bootstrap only: when any user already exists this does nothing
    /// and returns `None`. All later user management flows through
    /// the normal audited mutation path.
    ///
    /// # Errors
    ///
    /// Returns an error if the users table cannot be read or written.
    pub fn create_initial_admin(
        &mut self,
        username: &str,
        name: &str,
        email: &str,
    ) -> Result<Option<i64>, StoreError> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(None);
        }

        self.conn.execute(
            "INSERT INTO users (username, name, email, role) VALUES (?1, ?2, ?3, 'admin')",
            params![username, name, email],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, username, "Seeded initial admin user");
        Ok(Some(id))
    }

    /// Adds a resource.
    ///
    /// Returns the created entity: the denormalized read-back row
    /// when the resource defines one, otherwise the input fields plus
    /// the generated id.
    ///
    /// # Arguments
    ///
    /// * `actor_id` - The acting user, recorded in the audit entry
    /// * `kind` - The resource type to add
    /// * `input` - Validated scalar fields and optional image
    ///
    /// # Errors
    ///
    /// Returns a client error when a referenced parent does not exist
    /// or a unique field collides, and an opaque error otherwise.
    pub fn add(
        &mut self,
        actor_id: i64,
        kind: ResourceKind,
        input: &NewResource,
    ) -> Result<Record, StoreError> {
        let descriptor = descriptor(kind);
        let image = resolve_image_plan(&self.conn, input.image.as_deref())?;

        let snapshot = snapshot_with_image(descriptor, &input.fields, input.image.as_deref());
        let audit = AuditSpec {
            actor_id: Some(actor_id),
            action: AuditAction::new(kind, Operation::Add),
            old_value: None,
            new_value: Some(snapshot.to_json()),
        };

        let plan = build_add(descriptor, &input.fields, &image, Some(&audit));
        let insert_index = usize::from(matches!(image, ImagePlan::New(_)));

        let outcomes = execute_plan(&mut self.conn, &plan)
            .map_err(|err| classify_mutation_failure(&self.conn, descriptor, &input.fields, &err))?;
        debug!(kind = kind.as_str(), "Added resource");

        if let Some(record) = fetched_row(&outcomes) {
            return Ok(record);
        }

        let mut created = Record::new();
        if let Some(id) = outcomes.get(insert_index).and_then(|o| o.generated_id) {
            created.set("id", FieldValue::Integer(id));
        }
        for (field, value) in snapshot.fields() {
            created.set(field, value.clone());
        }
        Ok(created)
    }

    /// Edits a resource by id.
    ///
    /// Partial input merges onto the freshly fetched snapshot; when
    /// the merge changes nothing the edit is elided entirely — no
    /// statement runs and no audit entry is written. A user editing
    /// their own account is audited by neither.
    ///
    /// # Errors
    ///
    /// Returns a client error when the resource does not exist, a
    /// referenced parent does not exist, or a unique field collides.
    pub fn edit(
        &mut self,
        actor_id: i64,
        kind: ResourceKind,
        id: i64,
        patch: &Patch,
    ) -> Result<Record, StoreError> {
        let descriptor = descriptor(kind);
        let old = self
            .fetch(descriptor, id)?
            .ok_or(ClientError::NotFound { kind, id })?;

        let merged = merge_patch(descriptor, &old, patch);
        if diff(&old, &merged).is_empty() {
            debug!(kind = kind.as_str(), id, "Edit changed nothing, skipping");
            return Ok(merged);
        }

        let image = match merged.get("image") {
            Some(FieldValue::Text(identifier)) if descriptor.has_image() => {
                resolve_image_plan(&self.conn, Some(identifier))?
            }
            _ => ImagePlan::Absent,
        };

        let self_edit = kind == ResourceKind::User && actor_id == id;
        let audit = if self_edit {
            None
        } else {
            Some(AuditSpec {
                actor_id: Some(actor_id),
                action: AuditAction::new(kind, Operation::Edit),
                old_value: Some(old.to_json()),
                new_value: Some(merged.to_json()),
            })
        };

        let plan = build_edit(descriptor, id, &merged, &image, audit.as_ref());
        let outcomes = execute_plan(&mut self.conn, &plan)
            .map_err(|err| classify_mutation_failure(&self.conn, descriptor, &merged, &err))?;
        debug!(kind = kind.as_str(), id, "Edited resource");

        Ok(fetched_row(&outcomes).unwrap_or(merged))
    }

    /// Deletes a resource by id.
    ///
    /// A user deleting their own account is still audited, with a
    /// null actor: the DELETE precedes the audit insert in the same
    /// transaction, so the entry records the actor the way actor
    /// deletion would have left it anyway.
    ///
    /// # Errors
    ///
    /// Returns a client error when the resource does not exist or is
    /// still referenced by dependents.
    pub fn delete(&mut self, actor_id: i64, kind: ResourceKind, id: i64) -> Result<(), StoreError> {
        let descriptor = descriptor(kind);
        let old = self
            .fetch(descriptor, id)?
            .ok_or(ClientError::NotFound { kind, id })?;

        let self_delete = kind == ResourceKind::User && actor_id == id;
        let audit = AuditSpec {
            actor_id: (!self_delete).then_some(actor_id),
            action: AuditAction::new(kind, Operation::Delete),
            old_value: Some(old.to_json()),
            new_value: None,
        };

        let plan = build_delete(descriptor, id, Some(&audit));
        execute_plan(&mut self.conn, &plan)
            .map_err(|err| classify_delete_failure(&self.conn, descriptor, id, &err))?;
        debug!(kind = kind.as_str(), id, "Deleted resource");
        Ok(())
    }

    /// Fetches a resource by id.
    ///
    /// # Errors
    ///
    /// Returns a not-found client error when no such row exists.
    pub fn get(&self, kind: ResourceKind, id: i64) -> Result<Record, StoreError> {
        let descriptor = descriptor(kind);
        self.fetch(descriptor, id)?
            .ok_or_else(|| ClientError::NotFound { kind, id }.into())
    }

    /// Lists all resources of a kind, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self, kind: ResourceKind) -> Result<Vec<Record>, StoreError> {
        let descriptor = descriptor(kind);
        let sql = select_all_sql(descriptor);

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();
        let mut rows = stmt.query([])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(row_to_record(&names, row)?);
        }
        Ok(records)
    }

    /// Lists one page of audit entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_page(&self, page: usize) -> Result<Vec<AuditEntry>, StoreError> {
        audit_log::list_audit_page(&self.conn, page)
    }

    fn fetch(
        &self,
        descriptor: &ResourceDescriptor,
        id: i64,
    ) -> Result<Option<Record>, StoreError> {
        let sql = select_by_id_sql(descriptor);

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();
        let mut rows = stmt.query(params![id])?;

        match rows.next()? {
            Some(row) => Ok(Some(row_to_record(&names, row)?)),
            None => Ok(None),
        }
    }
}

/// The audit snapshot of an add: the input fields, with the image
/// identifier folded in for image-bearing resources. The generated id
/// is not known when the plan is built, so add snapshots carry none.
fn snapshot_with_image(
    descriptor: &ResourceDescriptor,
    fields: &Record,
    image: Option<&str>,
) -> Record {
    let mut snapshot = fields.clone();
    if descriptor.has_image() {
        let value = image.map_or(FieldValue::Null, |identifier| {
            FieldValue::Text(identifier.to_string())
        });
        snapshot.set("image", value);
    }
    snapshot
}

fn fetched_row(outcomes: &[StepOutcome]) -> Option<Record> {
    outcomes
        .iter()
        .find(|outcome| !outcome.rows.is_empty())
        .and_then(|outcome| outcome.rows.first())
        .cloned()
}

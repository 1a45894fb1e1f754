// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The equality-gated update guard.
//!
//! Edits arrive as partial input. [`merge_patch`] folds that input
//! onto a freshly fetched old snapshot, and [`diff`] reports what
//! actually changed. An empty diff means the edit is a true no-op:
//! the caller returns the merged entity without executing any plan
//! and without writing an audit entry.
//!
//! Known limitation, preserved on purpose: the snapshot is read
//! moments before the commit, so two concurrent edits of the same
//! entity can race and the last writer wins. The underlying
//! single-connection transaction is the only isolation in play.

use mela_domain::{FieldValue, ImageChange, Patch, Record, ResourceDescriptor};

/// One changed field between the old snapshot and the merged entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiff {
    /// The field name.
    pub field: String,
    /// The value before the edit.
    pub old: FieldValue,
    /// The value after the edit.
    pub new: FieldValue,
}

/// Merges partial edit input onto the old snapshot, field by field.
///
/// Rules, per column of the descriptor:
/// - a field present and non-null in the patch wins;
/// - a field explicitly set to null stays null only when the column
///   is nullable, otherwise the old value is kept;
/// - a field absent from the patch falls back to the old value.
///
/// The image reference follows the same rules through the patch's
/// tri-state image change. The snapshot's `id` field is always
/// preserved.
#[must_use]
pub fn merge_patch(descriptor: &ResourceDescriptor, old: &Record, patch: &Patch) -> Record {
    let mut merged = old.clone();

    for column in descriptor.columns {
        match patch.field(column.name) {
            None => {}
            Some(FieldValue::Null) => {
                if column.nullable {
                    merged.set(column.name, FieldValue::Null);
                }
            }
            Some(value) => merged.set(column.name, value.clone()),
        }
    }

    if descriptor.has_image() {
        match patch.image() {
            ImageChange::Unchanged => {}
            ImageChange::Clear => merged.set("image", FieldValue::Null),
            ImageChange::Set(identifier) => {
                merged.set("image", FieldValue::Text(identifier.clone()));
            }
        }
    }

    merged
}

/// Computes the field-level difference between the old snapshot and
/// the merged entity.
///
/// Both records are built over the same descriptor field set, so the
/// diff walks the merged record's fields; a field somehow absent from
/// the old snapshot counts as previously null.
#[must_use]
pub fn diff(old: &Record, new: &Record) -> Vec<FieldDiff> {
    let mut changes: Vec<FieldDiff> = Vec::new();

    for (name, new_value) in new.fields() {
        let old_value = old.get(name).cloned().unwrap_or(FieldValue::Null);
        if &old_value != new_value {
            changes.push(FieldDiff {
                field: name.clone(),
                old: old_value,
                new: new_value.clone(),
            });
        }
    }

    changes
}

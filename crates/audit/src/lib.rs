// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit types for the Mela festival CMS.
//!
//! Every successful mutating operation produces exactly one audit
//! entry, committed atomically with the mutation it describes. Entries
//! are append-only: never mutated, never deleted. The sole carve-out
//! is a user editing their own account, which is deliberately not
//! logged.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

use mela_domain::ResourceKind;
use serde::{Deserialize, Serialize};

/// The mutating operation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Edit,
    Delete,
}

impl Operation {
    /// Stable identifier used in action labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was done, to which resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditAction {
    /// The resource type that was mutated.
    pub kind: ResourceKind,
    /// The mutating operation.
    pub operation: Operation,
}

impl AuditAction {
    /// Creates an action.
    #[must_use]
    pub const fn new(kind: ResourceKind, operation: Operation) -> Self {
        Self { kind, operation }
    }

    /// Stable stored form, e.g. `events.add`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}.{}", self.kind.as_str(), self.operation.as_str())
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.kind.as_str(), self.operation.as_str())
    }
}

/// An immutable audit-log entry.
///
/// Snapshots are opaque serialized entity states; the log does not
/// interpret their shape. Field names inside a snapshot are the
/// entity's own field names, with no schema version tag — historical
/// entries may drift from the current schema over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The entry id; entries are ordered newest-first by this id.
    pub id: i64,
    /// The acting user's id. Null when the actor was later deleted.
    pub actor_id: Option<i64>,
    /// The stored action label, e.g. `events.add`.
    pub action: String,
    /// The entity state before the mutation. Absent for adds.
    pub old_value: Option<serde_json::Value>,
    /// The entity state after the mutation. Absent for deletes.
    pub new_value: Option<serde_json::Value>,
    /// Creation timestamp, as stored (ISO 8601).
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_action_label_is_kind_dot_operation() {
        let action = AuditAction::new(ResourceKind::Event, Operation::Add);
        assert_eq!(action.label(), "events.add");

        let action = AuditAction::new(ResourceKind::User, Operation::Delete);
        assert_eq!(action.label(), "users.delete");
    }

    #[test]
    fn test_action_display_matches_label() {
        let action = AuditAction::new(ResourceKind::Day, Operation::Edit);
        assert_eq!(action.to_string(), action.label());
    }

    #[test]
    fn test_operation_identifiers_are_stable() {
        assert_eq!(Operation::Add.as_str(), "add");
        assert_eq!(Operation::Edit.as_str(), "edit");
        assert_eq!(Operation::Delete.as_str(), "delete");
    }

    #[test]
    fn test_entry_serialization_round_trip() {
        let entry = AuditEntry {
            id: 3,
            actor_id: Some(1),
            action: String::from("days.add"),
            old_value: None,
            new_value: Some(serde_json::json!({"title": "Day 1"})),
            created_at: String::from("2026-02-06 10:00:00"),
        };

        let json = serde_json::to_string(&entry).expect("serializes");
        let back: AuditEntry = serde_json::from_str(&json).expect("deserializes");

        assert_eq!(back, entry);
    }

    #[test]
    fn test_entry_actor_is_nullable() {
        let entry = AuditEntry {
            id: 9,
            actor_id: None,
            action: String::from("venues.delete"),
            old_value: Some(serde_json::json!({"title": "Main Stage"})),
            new_value: None,
            created_at: String::from("2026-02-06 10:00:00"),
        };

        assert!(entry.actor_id.is_none());
        assert!(entry.new_value.is_none());
    }
}

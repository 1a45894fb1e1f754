// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use mela_audit::{AuditAction, Operation};
use mela_domain::{FieldValue, Record, ResourceKind};

use crate::AuditSpec;

pub fn day_record(title: &str, date: &str) -> Record {
    Record::new()
        .with_field("title", FieldValue::from(title))
        .with_field("date", FieldValue::from(date))
}

pub fn sponsor_record(title: &str) -> Record {
    Record::new()
        .with_field("title", FieldValue::from(title))
        .with_field("website", FieldValue::Null)
}

pub fn add_audit(kind: ResourceKind, new_value: serde_json::Value) -> AuditSpec {
    AuditSpec {
        actor_id: Some(1),
        action: AuditAction::new(kind, Operation::Add),
        old_value: None,
        new_value: Some(new_value),
    }
}

// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod executor_tests;
mod store_tests;

use mela_domain::{FieldValue, NewResource, Record};

use crate::CmsStore;

/// The seeded admin's id, always the first user row.
pub const ADMIN_ID: i64 = 1;

pub fn store() -> CmsStore {
    let mut store = CmsStore::new_in_memory().expect("open in-memory store");
    let seeded = store
        .create_initial_admin("admin", "Admin", "admin@example.com")
        .expect("seed admin");
    assert_eq!(seeded, Some(ADMIN_ID));
    store
}

pub fn new_day(title: &str, date: &str) -> NewResource {
    NewResource::new(
        Record::new()
            .with_field("title", FieldValue::from(title))
            .with_field("date", FieldValue::from(date)),
    )
}

pub fn new_category(name: &str) -> NewResource {
    NewResource::new(Record::new().with_field("name", FieldValue::from(name)))
}

pub fn new_venue(title: &str) -> NewResource {
    NewResource::new(
        Record::new()
            .with_field("title", FieldValue::from(title))
            .with_field("address", FieldValue::Null),
    )
}

pub fn new_sponsor(title: &str) -> NewResource {
    NewResource::new(
        Record::new()
            .with_field("title", FieldValue::from(title))
            .with_field("website", FieldValue::Null),
    )
}

pub fn record_id(record: &Record) -> i64 {
    match record.get("id") {
        Some(FieldValue::Integer(id)) => *id,
        other => panic!("record has no integer id: {other:?}"),
    }
}

pub fn count_rows(store: &CmsStore, table: &str) -> i64 {
    store
        .conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .expect("count rows")
}

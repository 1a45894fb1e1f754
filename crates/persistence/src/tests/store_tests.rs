// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mela_domain::{FieldValue, ImageChange, NewResource, Patch, Record, ResourceKind};

use super::{ADMIN_ID, count_rows, new_category, new_day, new_sponsor, new_venue, record_id, store};
use crate::{ClientError, CmsStore, StoreError};

fn new_event(category_id: i64, day_id: i64, venue_id: i64) -> NewResource {
    NewResource::new(
        Record::new()
            .with_field("title", FieldValue::from("Robo Wars"))
            .with_field("description", FieldValue::from("Autonomous robot combat"))
            .with_field("start_time", FieldValue::from("2020-02-06T10:00:00"))
            .with_field("end_time", FieldValue::from("2020-02-06T12:00:00"))
            .with_field("category_id", FieldValue::Integer(category_id))
            .with_field("day_id", FieldValue::Integer(day_id))
            .with_field("venue_id", FieldValue::Integer(venue_id))
            .with_field("room_id", FieldValue::Null),
    )
}

fn seed_event_parents(store: &mut CmsStore) -> (i64, i64, i64) {
    let category = store
        .add(ADMIN_ID, ResourceKind::Category, &new_category("Robotics"))
        .expect("add category");
    let day = store
        .add(ADMIN_ID, ResourceKind::Day, &new_day("Day 1", "2020-02-06"))
        .expect("add day");
    let venue = store
        .add(ADMIN_ID, ResourceKind::Venue, &new_venue("Main Block"))
        .expect("add venue");
    (record_id(&category), record_id(&day), record_id(&venue))
}

#[test]
fn test_add_returns_entity_with_generated_id() {
    let mut store = store();

    let day = store
        .add(ADMIN_ID, ResourceKind::Day, &new_day("Day 1", "2020-02-06"))
        .expect("add day");

    assert!(record_id(&day) > 0);
    assert_eq!(day.get("title"), Some(&FieldValue::from("Day 1")));
    assert_eq!(day.get("date"), Some(&FieldValue::from("2020-02-06")));
}

#[test]
fn test_identical_edit_after_add_changes_nothing() {
    let mut store = store();
    let day = store
        .add(ADMIN_ID, ResourceKind::Day, &new_day("Day 1", "2020-02-06"))
        .expect("add day");
    let id = record_id(&day);
    assert_eq!(count_rows(&store, "audit_log"), 1);

    // Same values again: the merge produces an identical entity, so
    // nothing is written and no audit entry appears.
    let patch = Patch::new()
        .with_field("title", FieldValue::from("Day 1"))
        .with_field("date", FieldValue::from("2020-02-06"));
    let edited = store
        .edit(ADMIN_ID, ResourceKind::Day, id, &patch)
        .expect("identical edit");

    assert_eq!(edited.get("title"), Some(&FieldValue::from("Day 1")));
    assert_eq!(count_rows(&store, "audit_log"), 1);
}

#[test]
fn test_edit_merges_partial_input_onto_old_snapshot() {
    let mut store = store();
    let day = store
        .add(ADMIN_ID, ResourceKind::Day, &new_day("Day 1", "2020-02-06"))
        .expect("add day");
    let id = record_id(&day);

    let patch = Patch::new().with_field("title", FieldValue::from("Opening Day"));
    let edited = store
        .edit(ADMIN_ID, ResourceKind::Day, id, &patch)
        .expect("edit day");

    assert_eq!(edited.get("title"), Some(&FieldValue::from("Opening Day")));
    // Untouched field falls back to the old value.
    assert_eq!(edited.get("date"), Some(&FieldValue::from("2020-02-06")));
    assert_eq!(count_rows(&store, "audit_log"), 2);
}

#[test]
fn test_event_add_returns_denormalized_read_back() {
    let mut store = store();
    let (category_id, day_id, venue_id) = seed_event_parents(&mut store);

    let event = store
        .add(
            ADMIN_ID,
            ResourceKind::Event,
            &new_event(category_id, day_id, venue_id),
        )
        .expect("add event");

    assert_eq!(event.get("title"), Some(&FieldValue::from("Robo Wars")));
    assert_eq!(
        event.get("category_name"),
        Some(&FieldValue::from("Robotics"))
    );
    assert_eq!(event.get("day_title"), Some(&FieldValue::from("Day 1")));
    assert_eq!(
        event.get("venue_title"),
        Some(&FieldValue::from("Main Block"))
    );
}

#[test]
fn test_same_image_identifier_shares_one_stored_row() {
    let mut store = store();

    let first = store
        .add(
            ADMIN_ID,
            ResourceKind::Sponsor,
            &new_sponsor("Acme").with_image("a1b2c3.png"),
        )
        .expect("add first sponsor");
    let second = store
        .add(
            ADMIN_ID,
            ResourceKind::Sponsor,
            &new_sponsor("Globex").with_image("a1b2c3.png"),
        )
        .expect("add second sponsor");

    assert_eq!(count_rows(&store, "images"), 1);
    assert_eq!(first.get("image"), Some(&FieldValue::from("a1b2c3.png")));
    assert_eq!(second.get("image"), Some(&FieldValue::from("a1b2c3.png")));

    // Both rows reference the same image id.
    let distinct: i64 = store
        .conn
        .query_row(
            "SELECT COUNT(DISTINCT image_id) FROM sponsors",
            [],
            |row| row.get(0),
        )
        .expect("distinct image ids");
    assert_eq!(distinct, 1);
}

#[test]
fn test_clearing_an_image_keeps_the_stored_row() {
    let mut store = store();
    let sponsor = store
        .add(
            ADMIN_ID,
            ResourceKind::Sponsor,
            &new_sponsor("Acme").with_image("a1b2c3.png"),
        )
        .expect("add sponsor");
    let id = record_id(&sponsor);

    let patch = Patch::new().with_image(ImageChange::Clear);
    let edited = store
        .edit(ADMIN_ID, ResourceKind::Sponsor, id, &patch)
        .expect("clear image");

    assert_eq!(edited.get("image"), Some(&FieldValue::Null));
    // Image rows are shared and never deleted here.
    assert_eq!(count_rows(&store, "images"), 1);
}

#[test]
fn test_dangling_reference_names_the_offending_field() {
    let mut store = store();
    let (category_id, _, venue_id) = seed_event_parents(&mut store);

    let err = store
        .add(
            ADMIN_ID,
            ResourceKind::Event,
            &new_event(category_id, 9999, venue_id),
        )
        .expect_err("dangling day");

    assert_eq!(
        err,
        StoreError::Client(ClientError::MissingReference {
            field: String::from("day_id"),
        })
    );
    assert_eq!(err.to_string(), "Given 'day_id' does not exist");
    assert_eq!(count_rows(&store, "events"), 0);
    assert_eq!(count_rows(&store, "audit_log"), 3);
}

#[test]
fn test_delete_blocked_by_dependents_names_the_resource() {
    let mut store = store();
    let (category_id, day_id, venue_id) = seed_event_parents(&mut store);
    store
        .add(
            ADMIN_ID,
            ResourceKind::Event,
            &new_event(category_id, day_id, venue_id),
        )
        .expect("add event");

    let err = store
        .delete(ADMIN_ID, ResourceKind::Category, category_id)
        .expect_err("category in use");

    assert_eq!(
        err.to_string(),
        "Category is being used by one or more events"
    );
    assert_eq!(count_rows(&store, "categories"), 1);
}

#[test]
fn test_delete_conflict_names_the_actual_dependent() {
    let mut store = store();
    let venue = store
        .add(ADMIN_ID, ResourceKind::Venue, &new_venue("Main Block"))
        .expect("add venue");
    let venue_id = record_id(&venue);
    store
        .add(
            ADMIN_ID,
            ResourceKind::Room,
            &NewResource::new(
                Record::new()
                    .with_field("title", FieldValue::from("Hall A"))
                    .with_field("venue_id", FieldValue::Integer(venue_id)),
            ),
        )
        .expect("add room");

    // The venue is held by a room, not an event, and the message
    // says so.
    let err = store
        .delete(ADMIN_ID, ResourceKind::Venue, venue_id)
        .expect_err("venue in use");

    assert_eq!(err.to_string(), "Venue is being used by one or more rooms");
    assert_eq!(count_rows(&store, "venues"), 1);
}

#[test]
fn test_self_delete_of_own_account_succeeds_with_null_actor() {
    let mut store = store();

    store
        .delete(ADMIN_ID, ResourceKind::User, ADMIN_ID)
        .expect("delete own account");

    assert_eq!(count_rows(&store, "users"), 0);
    // The entry outlives its actor, already null.
    let entries = store.list_audit_page(0).expect("audit page");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "users.delete");
    assert_eq!(entries[0].actor_id, None);
}

#[test]
fn test_delete_removes_row_and_later_get_misses() {
    let mut store = store();
    let day = store
        .add(ADMIN_ID, ResourceKind::Day, &new_day("Day 1", "2020-02-06"))
        .expect("add day");
    let id = record_id(&day);

    store
        .delete(ADMIN_ID, ResourceKind::Day, id)
        .expect("delete day");

    let err = store.get(ResourceKind::Day, id).expect_err("gone");
    assert!(matches!(
        err,
        StoreError::Client(ClientError::NotFound {
            kind: ResourceKind::Day,
            ..
        })
    ));
}

#[test]
fn test_duplicate_username_is_a_client_error() {
    let mut store = store();
    let user = NewResource::new(
        Record::new()
            .with_field("username", FieldValue::from("admin"))
            .with_field("name", FieldValue::from("Impostor"))
            .with_field("email", FieldValue::from("impostor@example.com"))
            .with_field("phone", FieldValue::Null)
            .with_field("role", FieldValue::from("editor")),
    );

    let err = store
        .add(ADMIN_ID, ResourceKind::User, &user)
        .expect_err("duplicate username");

    assert_eq!(
        err,
        StoreError::Client(ClientError::Duplicate {
            field: String::from("username"),
            value: String::from("admin"),
        })
    );
    assert_eq!(count_rows(&store, "users"), 1);
}

#[test]
fn test_editing_a_missing_resource_is_not_found() {
    let mut store = store();

    let err = store
        .edit(ADMIN_ID, ResourceKind::Venue, 42, &Patch::new())
        .expect_err("missing venue");

    assert_eq!(
        err,
        StoreError::Client(ClientError::NotFound {
            kind: ResourceKind::Venue,
            id: 42,
        })
    );
}

#[test]
fn test_list_returns_rows_in_id_order() {
    let mut store = store();
    store
        .add(ADMIN_ID, ResourceKind::Day, &new_day("Day 1", "2020-02-06"))
        .expect("add day 1");
    store
        .add(ADMIN_ID, ResourceKind::Day, &new_day("Day 2", "2020-02-07"))
        .expect("add day 2");

    let days = store.list(ResourceKind::Day).expect("list days");

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].get("title"), Some(&FieldValue::from("Day 1")));
    assert_eq!(days[1].get("title"), Some(&FieldValue::from("Day 2")));
}

#[test]
fn test_initial_admin_seeding_is_bootstrap_only() {
    let mut store = CmsStore::new_in_memory().expect("open store");

    let first = store
        .create_initial_admin("admin", "Admin", "admin@example.com")
        .expect("first seed");
    let second = store
        .create_initial_admin("other", "Other", "other@example.com")
        .expect("second seed");

    assert_eq!(first, Some(1));
    assert_eq!(second, None);
    assert_eq!(count_rows(&store, "users"), 1);
    // Bootstrap bypasses the audit path.
    assert_eq!(count_rows(&store, "audit_log"), 0);
}

// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mela_core::{MutationPlan, MutationStep, Param, PlanError};
use mela_domain::FieldValue;

use super::{count_rows, store};
use crate::executor::{ExecuteError, execute_plan};

fn insert_category(name: &str) -> MutationStep {
    MutationStep::new(
        String::from("INSERT INTO categories (name) VALUES (?1)"),
        vec![Param::Value(FieldValue::from(name))],
    )
}

#[test]
fn test_empty_plan_is_rejected_before_touching_the_database() {
    let mut store = store();
    let plan = MutationPlan::new();

    let err = execute_plan(&mut store.conn, &plan).expect_err("empty plan");
    assert!(matches!(err, ExecuteError::Plan(PlanError::Empty)));
}

#[test]
fn test_forward_reference_is_rejected_before_touching_the_database() {
    let mut store = store();
    let mut plan = MutationPlan::new();
    plan.push(MutationStep::new(
        String::from("INSERT INTO rooms (title, venue_id) VALUES (?1, ?2)"),
        vec![Param::Value(FieldValue::from("Hall A")), Param::GeneratedId(1)],
    ));
    plan.push(MutationStep::new(
        String::from("INSERT INTO venues (title) VALUES (?1)"),
        vec![Param::Value(FieldValue::from("Main Block"))],
    ));

    let err = execute_plan(&mut store.conn, &plan).expect_err("forward reference");
    assert!(matches!(
        err,
        ExecuteError::Plan(PlanError::ForwardReference {
            step: 0,
            referenced: 1
        })
    ));
    assert_eq!(count_rows(&store, "venues"), 0);
}

#[test]
fn test_generated_id_resolves_to_the_earlier_insert() {
    let mut store = store();
    let mut plan = MutationPlan::new();
    plan.push(MutationStep::new(
        String::from("INSERT INTO venues (title) VALUES (?1)"),
        vec![Param::Value(FieldValue::from("Main Block"))],
    ));
    plan.push(MutationStep::new(
        String::from("INSERT INTO rooms (title, venue_id) VALUES (?1, ?2)"),
        vec![Param::Value(FieldValue::from("Hall A")), Param::GeneratedId(0)],
    ));

    let outcomes = execute_plan(&mut store.conn, &plan).expect("plan runs");
    let venue_id = outcomes[0].generated_id.expect("venue id");

    let room_venue: i64 = store
        .conn
        .query_row("SELECT venue_id FROM rooms WHERE title = 'Hall A'", [], |row| {
            row.get(0)
        })
        .expect("room row");
    assert_eq!(room_venue, venue_id);
}

#[test]
fn test_failed_last_step_rolls_back_every_earlier_step() {
    let mut store = store();
    let mut plan = MutationPlan::new();
    plan.push(insert_category("Workshops"));
    plan.push(insert_category("Talks"));
    // References a user row that does not exist, so the final step
    // violates the audit actor foreign key.
    plan.push(MutationStep::new(
        String::from(
            "INSERT INTO audit_log (actor_id, action, old_value, new_value) \
             VALUES (?1, ?2, ?3, ?4)",
        ),
        vec![
            Param::Value(FieldValue::Integer(9999)),
            Param::Value(FieldValue::from("categories.add")),
            Param::Value(FieldValue::Null),
            Param::Value(FieldValue::Null),
        ],
    ));

    let err = execute_plan(&mut store.conn, &plan).expect_err("audit step fails");
    assert!(matches!(err, ExecuteError::Sqlite(_)));
    assert_eq!(count_rows(&store, "categories"), 0);
    assert_eq!(count_rows(&store, "audit_log"), 0);
}

#[test]
fn test_referencing_a_fetch_step_reports_missing_generated_id() {
    let mut store = store();
    let mut plan = MutationPlan::new();
    plan.push(MutationStep::fetch(
        String::from("SELECT id FROM users"),
        vec![],
    ));
    plan.push(MutationStep::new(
        String::from("INSERT INTO categories (name) VALUES (?1)"),
        vec![Param::GeneratedId(0)],
    ));

    let err = execute_plan(&mut store.conn, &plan).expect_err("no generated id");
    assert!(matches!(
        err,
        ExecuteError::MissingGeneratedId {
            step: 1,
            referenced: 0
        }
    ));
    assert_eq!(count_rows(&store, "categories"), 0);
}

#[test]
fn test_fetch_step_collects_rows_as_records() {
    let mut store = store();
    let mut plan = MutationPlan::new();
    plan.push(insert_category("Workshops"));
    plan.push(MutationStep::fetch(
        String::from("SELECT id, name FROM categories WHERE id = ?1"),
        vec![Param::GeneratedId(0)],
    ));

    let outcomes = execute_plan(&mut store.conn, &plan).expect("plan runs");
    let rows = &outcomes[1].rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&FieldValue::from("Workshops")));
}

// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The pure mutation machinery for the Mela festival CMS.
//!
//! This crate knows how to describe a mutation, not how to run one:
//!
//! - [`MutationPlan`] — an ordered list of SQL steps where later
//!   steps may reference earlier steps' generated row ids through
//!   typed [`Param::GeneratedId`] references rather than opaque
//!   closures, so the dependency graph is inspectable data.
//! - [`build_add`], [`build_edit`], [`build_delete`] — descriptor-
//!   driven plan builders shared by all eleven resource types.
//! - [`merge_patch`] and [`diff`] — the equality-gated update guard:
//!   merge partial input onto the fresh old snapshot, then skip the
//!   whole write when nothing changed.
//! - [`audit_step`] — pure construction of the trailing audit step
//!   every mutating plan carries.
//!
//! Execution against a database lives in `mela-persistence`.

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

mod builder;
mod merge;
mod plan;

#[cfg(test)]
mod tests;

pub use builder::{
    AuditSpec, ImagePlan, audit_step, build_add, build_delete, build_edit, select_all_sql,
    select_by_id_sql,
};
pub use merge::{FieldDiff, diff, merge_patch};
pub use plan::{MutationPlan, MutationStep, Param, PlanError};

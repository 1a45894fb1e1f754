// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite persistence for the Mela festival CMS.
//!
//! [`CmsStore`] is the single entry point: it owns one connection,
//! bootstraps the schema, and runs every mutation as an atomic plan
//! built by `mela-core`. The supporting modules split along the
//! execution pipeline:
//!
//! - [`executor`] runs a plan inside one transaction, resolving
//!   generated-id references between steps, and rolls everything back
//!   on the first failure.
//! - [`image`] resolves content-derived image identifiers to stored
//!   rows ahead of plan construction, so identical uploads share one
//!   row.
//! - [`classify`] turns constraint violations into client-facing
//!   errors after the rollback; everything else stays opaque.
//! - [`audit_log`] reads audit entries back, newest first, in fixed
//!   pages.

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

pub mod audit_log;
pub mod classify;
mod error;
pub mod executor;
pub mod image;
mod schema;
mod store;

#[cfg(test)]
mod tests;

pub use audit_log::{AUDIT_PAGE_SIZE, list_audit_page};
pub use classify::{classify_delete_failure, classify_mutation_failure};
pub use error::{ClientError, StoreError};
pub use executor::{ExecuteError, StepOutcome, execute_plan};
pub use image::{find_image, resolve_image_plan};
pub use store::CmsStore;

// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types for the Mela festival CMS.
//!
//! This crate defines the shapes the mutation machinery operates on:
//! scalar field values, generic resource records and edit patches, the
//! eleven resource kinds, and the static descriptor registry that
//! captures all per-resource variance (table, columns, nullability,
//! image column, read-back shape, uniqueness, foreign keys).
//!
//! Everything here is pure data. Persistence and plan construction
//! live in other crates.

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

mod descriptor;
mod image;
mod record;
mod resource;
mod value;

#[cfg(test)]
mod tests;

pub use descriptor::{ColumnSpec, ForeignKeySpec, ResourceDescriptor, descriptor};
pub use image::StoredImage;
pub use record::{ImageChange, NewResource, Patch, Record};
pub use resource::ResourceKind;
pub use value::FieldValue;

// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Image identity resolution.
//!
//! Uploaded images are identified by a content-derived identifier, so
//! uploading the same bytes twice yields the same identifier. Before
//! a plan is built, the resolver checks whether a row for the
//! identifier already exists: mutations reuse an existing row's id
//! and only plan an insert for genuinely new content.

use mela_core::ImagePlan;
use mela_domain::StoredImage;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreError;

/// Looks up a stored image by its content-derived identifier.
///
/// # Errors
///
/// Returns an error if the lookup query fails.
pub fn find_image(conn: &Connection, identifier: &str) -> Result<Option<StoredImage>, StoreError> {
    let found = conn
        .query_row(
            "SELECT id, identifier FROM images WHERE identifier = ?1",
            params![identifier],
            |row| {
                Ok(StoredImage {
                    id: row.get(0)?,
                    identifier: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(found)
}

/// Resolves a mutation's image situation ahead of plan construction.
///
/// # Errors
///
/// Returns an error if the identifier lookup fails.
pub fn resolve_image_plan(
    conn: &Connection,
    identifier: Option<&str>,
) -> Result<ImagePlan, StoreError> {
    let Some(identifier) = identifier else {
        return Ok(ImagePlan::Absent);
    };

    let plan = find_image(conn, identifier)?.map_or_else(
        || ImagePlan::New(identifier.to_string()),
        |image| ImagePlan::Existing(image.id),
    );
    Ok(plan)
}

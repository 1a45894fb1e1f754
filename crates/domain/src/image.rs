// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A stored uploaded image.
///
/// One row exists per distinct content-derived identifier. Rows are
/// never updated, and any number of resources may reference the same
/// row; images are shared, not owned. Orphan cleanup happens outside
/// this system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// The image row id, referenced by resource foreign keys.
    pub id: i64,
    /// The content-derived filename, e.g. a digest-based name produced
    /// by the upload handler.
    pub identifier: String,
}

impl StoredImage {
    /// Creates a stored-image handle.
    #[must_use]
    pub const fn new(id: i64, identifier: String) -> Self {
        Self { id, identifier }
    }
}

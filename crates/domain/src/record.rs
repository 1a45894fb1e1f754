// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::value::FieldValue;

/// An ordered set of named field values.
///
/// Records are the generic shape of every persisted resource entity:
/// fetched snapshots, merged edit results, and read-back responses are
/// all records. Field order follows the descriptor's column order, so
/// structural equality is field-by-field equality.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field, replacing any existing value under the same name.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns all fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serializes this record to its JSON snapshot form.
    ///
    /// Field names in the snapshot are the entity's own field names;
    /// there is no schema version tag.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}

/// How an edit changes a resource's image reference.
///
/// Distinguishing "not mentioned" from "explicitly cleared" matters:
/// an absent image field falls back to the old value, while an
/// explicit null clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChange {
    /// The patch does not touch the image.
    Unchanged,
    /// The patch explicitly clears the image.
    Clear,
    /// The patch sets the image to this content-derived identifier.
    Set(String),
}

/// Partial input for an edit operation.
///
/// A field present and non-null wins over the old value; a field
/// explicitly set to null is preserved as null only when the
/// descriptor marks it nullable; absent fields fall back to the old
/// snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patch {
    fields: Vec<(String, FieldValue)>,
    image: ImageChange,
}

impl Default for ImageChange {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl Patch {
    /// Creates an empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: Vec::new(),
            image: ImageChange::Unchanged,
        }
    }

    /// Builder-style field setter. `FieldValue::Null` is an explicit
    /// null, not an absence.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: FieldValue) -> Self {
        self.fields.push((name.to_string(), value));
        self
    }

    /// Builder-style image change setter.
    #[must_use]
    pub fn with_image(mut self, image: ImageChange) -> Self {
        self.image = image;
        self
    }

    /// Returns the patched value for a field, if the patch touches it.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns the image change carried by this patch.
    #[must_use]
    pub const fn image(&self) -> &ImageChange {
        &self.image
    }
}

/// Validated input for an add operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    /// Scalar field values, keyed by descriptor column names.
    pub fields: Record,
    /// Content-derived identifier of an already-stored upload, if the
    /// resource carries an image.
    pub image: Option<String>,
}

impl NewResource {
    /// Creates an input with no image.
    #[must_use]
    pub const fn new(fields: Record) -> Self {
        Self {
            fields,
            image: None,
        }
    }

    /// Builder-style image identifier setter.
    #[must_use]
    pub fn with_image(mut self, identifier: &str) -> Self {
        self.image = Some(identifier.to_string());
        self
    }
}

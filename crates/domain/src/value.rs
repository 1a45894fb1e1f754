// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A single scalar field value as stored in a resource row.
///
/// This is the only value shape the mutation machinery understands.
/// Richer types (dates, prices) arrive here already validated and
/// rendered to their storage form by upstream request handling.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// SQL NULL.
    Null,
    /// A 64-bit integer (ids, foreign keys, counts).
    Integer(i64),
    /// A floating-point number (prices).
    Real(f64),
    /// A text value (titles, ISO-8601 dates, identifiers).
    Text(String),
}

impl FieldValue {
    /// Returns `true` if this value is SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts this value to its JSON snapshot form.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Integer(v) => serde_json::Value::from(*v),
            Self::Real(v) => serde_json::Value::from(*v),
            Self::Text(v) => serde_json::Value::from(v.clone()),
        }
    }

    /// Reconstructs a field value from its JSON snapshot form.
    ///
    /// Returns `None` for JSON shapes that never appear in snapshots
    /// (arrays, objects).
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Self::Null),
            serde_json::Value::Bool(b) => Some(Self::Integer(i64::from(*b))),
            serde_json::Value::Number(n) => n.as_i64().map_or_else(
                || n.as_f64().map(Self::Real),
                |v| Some(Self::Integer(v)),
            ),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

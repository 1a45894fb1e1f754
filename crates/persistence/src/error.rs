// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mela_core::PlanError;
use mela_domain::ResourceKind;

/// Errors caused by the caller's input, safe to show verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// A foreign key field referenced a row that does not exist.
    #[error("Given '{field}' does not exist")]
    MissingReference {
        /// The input field holding the dangling reference
        field: String,
    },

    /// The resource is referenced by dependent rows and cannot be
    /// deleted.
    #[error("{message}")]
    InUse {
        /// Resource-specific conflict message
        message: String,
    },

    /// A unique field collided with an existing row.
    #[error("The {field} '{value}' is already in use")]
    Duplicate {
        /// The unique field that collided
        field: String,
        /// The colliding value
        value: String,
    },

    /// The targeted resource does not exist.
    #[error("{} with id {id} not found", kind.display_name())]
    NotFound {
        /// The resource that was looked up
        kind: ResourceKind,
        /// The id that missed
        id: i64,
    },
}

/// Top-level store error.
///
/// `Client` errors carry messages meant for the caller. `Unknown`
/// keeps the detail out of its `Display` output; the underlying cause
/// is logged at the point of classification instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Input errors the caller can act on
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Everything else, presented opaquely
    #[error("An unknown error occurred")]
    Unknown(String),
}

impl From<crate::executor::ExecuteError> for StoreError {
    fn from(err: crate::executor::ExecuteError) -> Self {
        Self::Unknown(err.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Unknown(err.to_string())
    }
}

impl From<PlanError> for StoreError {
    fn from(err: PlanError) -> Self {
        Self::Unknown(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unknown(err.to_string())
    }
}

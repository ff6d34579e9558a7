//! Error types for the recommendation engine.
//!
//! Only corrupt input is an error. An empty catalog, an unknown anchor item
//! and an unknown interaction kind all degrade to empty or zero results.

use thiserror::Error;

use crate::types::ItemId;

/// Errors surfaced by the engine and its collaborators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecError {
    /// A required numeric field of a catalog item is not a finite number.
    #[error("malformed item {item_id}: field `{field}` is not a finite number")]
    MalformedItem {
        /// Offending item
        item_id: ItemId,
        /// Name of the bad field
        field: &'static str,
    },

    /// A catalog or interaction provider failed to produce its snapshot.
    #[error("data source error: {0}")]
    Source(String),

    /// Engine configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RecError>;

impl From<serde_json::Error> for RecError {
    fn from(err: serde_json::Error) -> Self {
        RecError::Config(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<RecError> for pyo3::PyErr {
    fn from(err: RecError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

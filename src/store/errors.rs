//! Document store error types
//!
//! Error codes:
//! - STRUCTPATH_STORE_UNRENDERED_PLACEHOLDER
//! - STRUCTPATH_STORE_PATH_CONFLICT
//! - STRUCTPATH_STORE_EMPTY_PATH
//! - STRUCTPATH_STORE_INVALID_RECORD
//! - STRUCTPATH_STORE_BACKEND

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A path still contains a `$key:` placeholder
    #[error("Path contains unrendered placeholder '{0}'")]
    UnrenderedPlaceholder(String),

    /// An intermediate path element exists but is not a map
    #[error("Cannot traverse '{path}': {reason}")]
    PathConflict { path: String, reason: String },

    /// Field operations need at least one path element
    #[error("Field path is empty")]
    EmptyPath,

    /// Records must be JSON objects
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Failure inside the backing store
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::UnrenderedPlaceholder(_) => "STRUCTPATH_STORE_UNRENDERED_PLACEHOLDER",
            StoreError::PathConflict { .. } => "STRUCTPATH_STORE_PATH_CONFLICT",
            StoreError::EmptyPath => "STRUCTPATH_STORE_EMPTY_PATH",
            StoreError::InvalidRecord(_) => "STRUCTPATH_STORE_INVALID_RECORD",
            StoreError::Backend(_) => "STRUCTPATH_STORE_BACKEND",
        }
    }
}

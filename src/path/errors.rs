//! Path resolution error types
//!
//! Error codes:
//! - STRUCTPATH_UNKNOWN_PATH
//! - STRUCTPATH_MISSING_QUERY_ARGUMENT
//! - STRUCTPATH_PATH_TOO_DEEP
//! - STRUCTPATH_EMPTY_PATH

use thiserror::Error;

/// Result type for path operations
pub type PathResult<T> = Result<T, PathError>;

/// Request-time path resolution failures.
///
/// All variants are fatal to the request that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path string is not present in the registry
    #[error("Unknown field path '{0}'")]
    UnknownPath(String),

    /// A placeholder had no matching entry in the query arguments
    #[error("Missing query argument '{0}'")]
    MissingQueryArgument(String),

    /// The chain exceeds the store nesting limit
    #[error("Path has {depth} elements, exceeding the maximum of {max}")]
    TooDeep { depth: usize, max: usize },

    /// A chain was built without any element
    #[error("Path chain must contain at least one element")]
    Empty,
}

impl PathError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PathError::UnknownPath(_) => "STRUCTPATH_UNKNOWN_PATH",
            PathError::MissingQueryArgument(_) => "STRUCTPATH_MISSING_QUERY_ARGUMENT",
            PathError::TooDeep { .. } => "STRUCTPATH_PATH_TOO_DEEP",
            PathError::Empty => "STRUCTPATH_EMPTY_PATH",
        }
    }
}

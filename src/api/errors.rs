//! Table error types
//!
//! Subsystem errors pass through unchanged and keep their own codes.
//! Table-level codes:
//! - STRUCTPATH_UNKNOWN_KEY_FIELD
//! - STRUCTPATH_MISSING_PRIMARY_KEY
//! - STRUCTPATH_INVALID_KEY_VALUE

use thiserror::Error;

use crate::config::ConfigError;
use crate::path::PathError;
use crate::schema::SchemaError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors returned by [`Table`](super::Table) operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Key attribute is not a top-level field of the table schema
    #[error("Key field '{key}' is not declared by table '{table}'")]
    UnknownKeyField { key: String, table: String },

    /// Record has no value for the primary key
    #[error("Record is missing primary key '{0}'")]
    MissingPrimaryKey(String),

    /// Key value does not have the declared type of its key field
    #[error("Invalid value {value} for key field '{key}'")]
    InvalidKeyValue { key: String, value: String },
}

impl TableError {
    /// Returns the stable error code, passing subsystem codes through
    pub fn code(&self) -> &'static str {
        match self {
            TableError::Schema(e) => e.code(),
            TableError::Path(e) => e.code(),
            TableError::Validation(e) => e.code(),
            TableError::Store(e) => e.code(),
            TableError::Config(e) => e.code(),
            TableError::UnknownKeyField { .. } => "STRUCTPATH_UNKNOWN_KEY_FIELD",
            TableError::MissingPrimaryKey(_) => "STRUCTPATH_MISSING_PRIMARY_KEY",
            TableError::InvalidKeyValue { .. } => "STRUCTPATH_INVALID_KEY_VALUE",
        }
    }
}

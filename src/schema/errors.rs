//! Schema error types
//!
//! Error codes:
//! - STRUCTPATH_SCHEMA_INVALID_FIELD_NAME
//! - STRUCTPATH_SCHEMA_INVALID_KEY_NAME_USAGE
//! - STRUCTPATH_SCHEMA_INVALID_KEY_NAME
//! - STRUCTPATH_SCHEMA_INVALID_MAX_NESTED_DEPTH
//! - STRUCTPATH_SCHEMA_INVALID_SELF_REF
//! - STRUCTPATH_SCHEMA_UNBOUNDED_RECURSION
//! - STRUCTPATH_SCHEMA_PATH_TOO_DEEP
//! - STRUCTPATH_SCHEMA_DUPLICATE_PATH
//! - STRUCTPATH_SCHEMA_ALREADY_REGISTERED
//! - STRUCTPATH_SCHEMA_MALFORMED
//!
//! Every schema error aborts construction of the table binding that
//! triggered it; a partially compiled registry is never returned.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Compile-time schema errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field name is empty or contains a reserved character
    #[error("Invalid field name '{name}' in schema '{schema}': {reason}")]
    InvalidFieldName {
        schema: String,
        name: String,
        reason: String,
    },

    /// `key_name` declared on a field that is not a keyed collection
    #[error("key_name '{key_name}' cannot be set on field '{field}' of type {field_type}")]
    InvalidKeyNameUsage {
        field: String,
        key_name: String,
        field_type: &'static str,
    },

    /// `key_name` is empty or misuses reserved characters
    #[error("Invalid key_name '{key_name}' on field '{field}': {reason}")]
    InvalidKeyName {
        field: String,
        key_name: String,
        reason: String,
    },

    /// `max_nested_depth` outside `1..=32`
    #[error("max_nested_depth {value} on field '{field}' must be between 1 and {max}")]
    InvalidMaxNestedDepth { field: String, value: usize, max: usize },

    /// `self_ref` used anywhere but as the value type of a dict
    #[error("Field '{field}' uses self_ref outside of a keyed collection")]
    InvalidSelfRef { field: String },

    /// Self-referencing collection without an indexed key name
    #[error("Self-referencing collection '{field}' requires an indexed key_name containing '{{i}}'")]
    UnboundedRecursion { field: String },

    /// Path exceeds the store nesting ceiling (strict mode only)
    #[error("Path '{path}' has {depth} elements, exceeding the maximum of {max}")]
    PathTooDeep { path: String, depth: usize, max: usize },

    /// The same path string was produced twice
    #[error("Path '{0}' is declared more than once")]
    DuplicatePath(String),

    /// A schema with this name is already registered
    #[error("Schema '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Schema file could not be read or parsed
    #[error("Malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidFieldName { .. } => "STRUCTPATH_SCHEMA_INVALID_FIELD_NAME",
            SchemaError::InvalidKeyNameUsage { .. } => "STRUCTPATH_SCHEMA_INVALID_KEY_NAME_USAGE",
            SchemaError::InvalidKeyName { .. } => "STRUCTPATH_SCHEMA_INVALID_KEY_NAME",
            SchemaError::InvalidMaxNestedDepth { .. } => "STRUCTPATH_SCHEMA_INVALID_MAX_NESTED_DEPTH",
            SchemaError::InvalidSelfRef { .. } => "STRUCTPATH_SCHEMA_INVALID_SELF_REF",
            SchemaError::UnboundedRecursion { .. } => "STRUCTPATH_SCHEMA_UNBOUNDED_RECURSION",
            SchemaError::PathTooDeep { .. } => "STRUCTPATH_SCHEMA_PATH_TOO_DEEP",
            SchemaError::DuplicatePath(_) => "STRUCTPATH_SCHEMA_DUPLICATE_PATH",
            SchemaError::AlreadyRegistered(_) => "STRUCTPATH_SCHEMA_ALREADY_REGISTERED",
            SchemaError::Malformed { .. } => "STRUCTPATH_SCHEMA_MALFORMED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SchemaError::InvalidFieldName {
            schema: "User".into(),
            name: "a[b".into(),
            reason: "contains reserved character '['".into(),
        };
        assert_eq!(err.code(), "STRUCTPATH_SCHEMA_INVALID_FIELD_NAME");
        assert_eq!(
            SchemaError::DuplicatePath("id".into()).code(),
            "STRUCTPATH_SCHEMA_DUPLICATE_PATH"
        );
    }

    #[test]
    fn test_unbounded_recursion_message() {
        let err = SchemaError::UnboundedRecursion {
            field: "children".into(),
        };
        assert!(err.to_string().contains("{i}"));
        assert!(err.to_string().contains("children"));
    }

    #[test]
    fn test_key_name_usage_message() {
        let err = SchemaError::InvalidKeyNameUsage {
            field: "name".into(),
            key_name: "nameId".into(),
            field_type: "string",
        };
        let display = err.to_string();
        assert!(display.contains("nameId"));
        assert!(display.contains("string"));
    }
}

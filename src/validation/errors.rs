//! Validation error types
//!
//! Error codes:
//! - STRUCTPATH_REQUIRED_FIELD_INVALID
//! - STRUCTPATH_REQUIRED_FIELD_MISSING
//!
//! Optional mismatches are not errors: they are returned as warnings next to
//! the pruned value.

use std::fmt;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Kind of mismatch found in a value tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// Value has the wrong runtime type
    TypeMismatch,
    /// Collection key does not match the declared key type
    KeyTypeMismatch,
    /// Key is not declared by the schema
    UnknownField,
    /// Declared key is absent
    MissingField,
}

/// Details about a mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "projects.p1.name")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
    pub kind: MismatchKind,
}

impl ValidationDetails {
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
            kind: MismatchKind::TypeMismatch,
        }
    }

    pub fn key_type_mismatch(field: impl Into<String>, expected: &str, key: &str) -> Self {
        Self {
            field: field.into(),
            expected: format!("{} key", expected),
            actual: format!("key '{}'", key),
            kind: MismatchKind::KeyTypeMismatch,
        }
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: "declared field".into(),
            actual: "undeclared field present".into(),
            kind: MismatchKind::UnknownField,
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: "field to be present".into(),
            actual: "missing".into(),
            kind: MismatchKind::MissingField,
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Failures that abort the whole operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field has the wrong type
    #[error("Required field invalid: {0}")]
    RequiredFieldInvalid(ValidationDetails),

    /// A required field is absent
    #[error("Required field missing: {0}")]
    RequiredFieldMissing(ValidationDetails),
}

impl ValidationError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::RequiredFieldInvalid(_) => "STRUCTPATH_REQUIRED_FIELD_INVALID",
            ValidationError::RequiredFieldMissing(_) => "STRUCTPATH_REQUIRED_FIELD_MISSING",
        }
    }

    /// Returns the mismatch that caused the failure
    pub fn details(&self) -> &ValidationDetails {
        match self {
            ValidationError::RequiredFieldInvalid(details)
            | ValidationError::RequiredFieldMissing(details) => details,
        }
    }
}

//! Observability events for structpath
//!
//! Events are explicit and typed. Each has a stable name and a severity.

use std::fmt;

/// Severity of an observable event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-request detail
    Debug,
    /// Normal operations
    Info,
    /// Recoverable issues (dropped data, skipped paths)
    Warn,
    /// Operation failures
    Error,
}

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration loaded
    ConfigLoaded,
    /// Schema definitions loaded from disk
    SchemasLoaded,

    // Compilation
    /// Schema compilation started
    SchemaCompileBegin,
    /// Schema compilation finished
    SchemaCompileComplete,
    /// A path exceeded the nesting ceiling and was not registered
    PathSkipped,

    // Validation
    /// An optional field, key or element was dropped from a value tree
    FieldDropped,
    /// A whole value was rejected and nothing was written or returned
    ValueRejected,
    /// A required field was missing or mistyped
    RequiredFieldInvalid,

    // Store requests
    /// Field read forwarded to the store
    StoreGet,
    /// Field write forwarded to the store
    StoreSet,
    /// Field removal forwarded to the store
    StoreRemove,
    /// Multi-record read by key forwarded to the store
    StoreQuery,
    /// Whole record written
    RecordPut,
    /// Whole record deleted
    RecordDelete,
}

impl Event {
    /// Returns the stable event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",

            Event::SchemaCompileBegin => "SCHEMA_COMPILE_BEGIN",
            Event::SchemaCompileComplete => "SCHEMA_COMPILE_COMPLETE",
            Event::PathSkipped => "PATH_SKIPPED_TOO_DEEP",

            Event::FieldDropped => "FIELD_DROPPED",
            Event::ValueRejected => "VALUE_REJECTED",
            Event::RequiredFieldInvalid => "REQUIRED_FIELD_INVALID",

            Event::StoreGet => "STORE_GET",
            Event::StoreSet => "STORE_SET",
            Event::StoreRemove => "STORE_REMOVE",
            Event::StoreQuery => "STORE_QUERY",
            Event::RecordPut => "RECORD_PUT",
            Event::RecordDelete => "RECORD_DELETE",
        }
    }

    /// Returns the severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PathSkipped | Event::FieldDropped | Event::ValueRejected => Severity::Warn,
            Event::RequiredFieldInvalid => Severity::Error,
            Event::StoreGet | Event::StoreSet | Event::StoreRemove | Event::StoreQuery => {
                Severity::Debug
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

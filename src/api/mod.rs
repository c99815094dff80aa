//! Table-facing request API
//!
//! Composes the path renderer and the validator in front of a
//! [`DocumentStore`](crate::store::DocumentStore).
//!
//! # Design Principles
//!
//! - Compiled schemas are shared and immutable
//! - Paths are resolved and rendered before any store call
//! - Required mismatches fail the request; optional ones are reported
//! - Error codes from subsystems pass through unchanged
//!
//! # Supported Operations
//!
//! - get, get_many
//! - set, set_unsafe, set_many
//! - remove, remove_many
//! - put_record, get_record, delete_record

mod errors;
mod request;
mod response;
mod table;

pub use errors::{TableError, TableResult};
pub use request::{FieldGetter, FieldRemover, FieldSetter, Setter, UnsafeFieldSetter};
pub use response::WriteReport;
pub use table::Table;

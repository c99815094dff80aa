//! Schema model and compiler
//!
//! Schemas describe the shape of stored documents. Compiling a schema
//! produces a registry of every addressable path, keyed by strings such as
//! `projects.{{projectId}}.name`.
//!
//! # Design Principles
//!
//! - Schemas are immutable once built or loaded
//! - Compilation is deterministic and idempotent
//! - Invalid declarations fail compilation; no partial registry is returned
//! - Paths deeper than the store allows are skipped, or rejected in strict mode

mod compiler;
mod errors;
mod loader;
mod registry;
mod types;

pub use compiler::{CompiledSchema, SchemaCompiler, SkippedPath, INDEX_PLACEHOLDER, RESERVED_CHARACTERS};
pub use errors::{SchemaError, SchemaResult};
pub use loader::SchemaLoader;
pub use registry::{FieldDescriptor, PathRegistry};
pub use types::{FieldDecl, FieldType, KeyType, ObjectSchema};

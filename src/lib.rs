//! structpath - schema-driven path mapping and validation for nested document stores
//!
//! Schemas compile once into a registry of field paths. Requests name a path,
//! supply the runtime keys for its placeholders, and have their values
//! checked against the schema before reaching the store.

pub mod api;
pub mod config;
pub mod observability;
pub mod path;
pub mod schema;
pub mod store;
pub mod validation;

pub use api::{FieldGetter, FieldRemover, FieldSetter, Setter, Table, TableError, TableResult, UnsafeFieldSetter, WriteReport};
pub use config::EngineConfig;
pub use path::{render, PathChain, PathElement, QueryArgs};
pub use schema::{CompiledSchema, FieldDecl, FieldType, KeyType, ObjectSchema, SchemaCompiler};
pub use store::{DocumentStore, MemoryStore, RecordKey};
pub use validation::{Validation, Validator};

//! Field descriptors and the flat path registry
//!
//! The registry maps human-facing path strings such as
//! `projects.{{projectId}}.name` to the descriptor compiled for that
//! location. It is built once by the compiler and read-only afterwards.

use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::FieldType;
use crate::path::{PathChain, PathError, PathResult};

/// Compiled, immutable metadata for one schema location
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name, or the key variable name for collection items
    pub name: String,
    /// Declared type, with `self_ref` resolved to the enclosing schema
    pub field_type: FieldType,
    pub required: bool,
    /// Query variable of a keyed collection
    pub key_name: Option<String>,
    /// Value type of a keyed collection
    pub item_type: Option<FieldType>,
    /// Compiled database path
    pub path: PathChain,
    /// Owning table
    pub table: String,
}

impl FieldDescriptor {
    /// Returns the registry key of this descriptor
    pub fn path_string(&self) -> String {
        self.path.to_path_string()
    }

    /// Returns whether this descriptor addresses one item of a collection
    pub fn is_collection_item(&self) -> bool {
        self.path.last().is_some_and(|e| e.is_placeholder())
    }
}

/// Flat mapping from path strings to field descriptors
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathRegistry {
    entries: BTreeMap<String, FieldDescriptor>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a descriptor under its path string.
    ///
    /// Depth is the compiler's concern; this only enforces uniqueness.
    pub(crate) fn insert(&mut self, descriptor: FieldDescriptor) -> SchemaResult<()> {
        let path = descriptor.path_string();
        if self.entries.contains_key(&path) {
            return Err(SchemaError::DuplicatePath(path));
        }
        self.entries.insert(path, descriptor);
        Ok(())
    }

    /// Looks up a descriptor by path string
    pub fn get(&self, path: &str) -> Option<&FieldDescriptor> {
        self.entries.get(path)
    }

    /// Looks up a descriptor, failing with `PathError::UnknownPath`
    pub fn resolve(&self, path: &str) -> PathResult<&FieldDescriptor> {
        self.get(path)
            .ok_or_else(|| PathError::UnknownPath(path.to_string()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in path-string order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns all registered path strings in order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

//! Document store collaborator
//!
//! The engine never talks to a transport. It hands rendered paths and
//! validated values to a [`DocumentStore`], which owns I/O, retries and
//! the numeric wire representation.

mod errors;
mod memory;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::path::PathChain;
use crate::validation::{NumericCoercion, PassThrough};

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

/// Key attribute and value identifying stored records.
///
/// The value keeps its JSON type: `5` and `"5"` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKey {
    /// Name of the key attribute
    pub name: String,
    /// Key value, a string or a number
    pub value: Value,
}

impl RecordKey {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::String(value) => write!(f, "{}={}", self.name, value),
            other => write!(f, "{}={}", self.name, other),
        }
    }
}

/// Backing document store for one table.
///
/// Paths passed in are fully rendered: they contain no placeholders.
pub trait DocumentStore: Send + Sync {
    /// Read the value at `path`, or `None` if the record or field is absent
    fn get_field(&self, key: &RecordKey, path: &PathChain) -> StoreResult<Option<Value>>;

    /// Read several paths of the same record
    fn get_fields(&self, key: &RecordKey, paths: &[PathChain]) -> StoreResult<Vec<Option<Value>>> {
        paths.iter().map(|path| self.get_field(key, path)).collect()
    }

    /// Write all values in one update, creating missing levels
    fn set_fields(&self, key: &RecordKey, updates: &[(PathChain, Value)]) -> StoreResult<()>;

    /// Remove all paths in one update; absent paths are ignored
    fn remove_fields(&self, key: &RecordKey, paths: &[PathChain]) -> StoreResult<()>;

    /// Replace the whole record
    fn put_record(&self, key: &RecordKey, record: Value) -> StoreResult<()>;

    fn get_record(&self, key: &RecordKey) -> StoreResult<Option<Value>>;

    /// Delete the record. Returns whether it existed.
    fn delete_record(&self, key: &RecordKey) -> StoreResult<bool>;

    /// Reads `paths` from every record whose `key.name` attribute equals
    /// `key.value`, at most `limit` records.
    ///
    /// Each row holds one entry per path, `None` where the field is absent.
    fn query_by_key(
        &self,
        key: &RecordKey,
        paths: &[PathChain],
        limit: Option<usize>,
    ) -> StoreResult<Vec<Vec<Option<Value>>>>;

    /// Numeric representation expected by this store
    fn coercion(&self) -> &dyn NumericCoercion {
        &PassThrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_key_keeps_value_type() {
        assert_ne!(RecordKey::new("id", 5), RecordKey::new("id", "5"));
        assert_eq!(RecordKey::new("id", 5).value, json!(5));
        assert_eq!(RecordKey::new("id", 5).to_string(), "id=5");
        assert_eq!(RecordKey::new("id", "u1").to_string(), "id=u1");
    }
}

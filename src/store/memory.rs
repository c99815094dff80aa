//! In-memory document store
//!
//! Records live in a `RwLock<HashMap>` keyed by the JSON text of the
//! primary key value, so `5` and `"5"` are distinct records. Writes
//! create missing intermediate levels from the path elements' defaults.
//! Multi-path updates are applied to a copy of the record and swapped in
//! only if every path succeeds.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::errors::{StoreError, StoreResult};
use super::{DocumentStore, RecordKey};
use crate::config::EngineConfig;
use crate::path::{PathChain, PathElement, PathKey};
use crate::validation::{NumericCoercion, PassThrough};

type RecordCache = HashMap<String, Value>;

/// Thread-safe in-memory store for a single table
pub struct MemoryStore {
    records: RwLock<RecordCache>,
    coercion: Box<dyn NumericCoercion>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store that leaves numbers unchanged
    pub fn new() -> Self {
        Self::with_coercion(Box::new(PassThrough))
    }

    pub fn with_coercion(coercion: Box<dyn NumericCoercion>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            coercion,
        }
    }

    /// Create a store using the numeric coercion selected by `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_coercion(config.coercion())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn get_field(&self, key: &RecordKey, path: &PathChain) -> StoreResult<Option<Value>> {
        if path.is_empty() {
            return Err(StoreError::EmptyPath);
        }
        let records = self.records.read().map_err(|e| StoreError::Backend(e.to_string()))?;
        match records.get(&record_id(key)) {
            Some(record) => read_path(record, path),
            None => Ok(None),
        }
    }

    fn set_fields(&self, key: &RecordKey, updates: &[(PathChain, Value)]) -> StoreResult<()> {
        let mut records = self.records.write().map_err(|e| StoreError::Backend(e.to_string()))?;

        let id = record_id(key);
        let mut record = match records.get(&id) {
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(StoreError::InvalidRecord(format!("record {} is not a map", key))),
            None => new_record(key),
        };
        for (path, value) in updates {
            set_path(&mut record, path, value.clone())?;
        }

        records.insert(id, Value::Object(record));
        Ok(())
    }

    fn remove_fields(&self, key: &RecordKey, paths: &[PathChain]) -> StoreResult<()> {
        let mut records = self.records.write().map_err(|e| StoreError::Backend(e.to_string()))?;
        let id = record_id(key);
        let Some(Value::Object(existing)) = records.get(&id) else {
            return Ok(());
        };

        let mut record = existing.clone();
        for path in paths {
            remove_path(&mut record, path)?;
        }

        records.insert(id, Value::Object(record));
        Ok(())
    }

    fn put_record(&self, key: &RecordKey, record: Value) -> StoreResult<()> {
        let Value::Object(mut record) = record else {
            return Err(StoreError::InvalidRecord(format!("record {} is not a map", key)));
        };
        record
            .entry(key.name.clone())
            .or_insert_with(|| key.value.clone());

        let mut records = self.records.write().map_err(|e| StoreError::Backend(e.to_string()))?;
        records.insert(record_id(key), Value::Object(record));
        Ok(())
    }

    fn get_record(&self, key: &RecordKey) -> StoreResult<Option<Value>> {
        let records = self.records.read().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records.get(&record_id(key)).cloned())
    }

    fn delete_record(&self, key: &RecordKey) -> StoreResult<bool> {
        let mut records = self.records.write().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(records.remove(&record_id(key)).is_some())
    }

    fn query_by_key(
        &self,
        key: &RecordKey,
        paths: &[PathChain],
        limit: Option<usize>,
    ) -> StoreResult<Vec<Vec<Option<Value>>>> {
        if paths.iter().any(PathChain::is_empty) {
            return Err(StoreError::EmptyPath);
        }
        let records = self.records.read().map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut matches: Vec<_> = records
            .iter()
            .filter(|(_, record)| record.get(&key.name) == Some(&key.value))
            .collect();
        matches.sort_by(|(a, _), (b, _)| a.cmp(b));

        matches
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(_, record)| {
                paths
                    .iter()
                    .map(|path| read_path(record, path))
                    .collect::<StoreResult<Vec<_>>>()
            })
            .collect()
    }

    fn coercion(&self) -> &dyn NumericCoercion {
        self.coercion.as_ref()
    }
}

fn record_id(key: &RecordKey) -> String {
    key.value.to_string()
}

fn new_record(key: &RecordKey) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert(key.name.clone(), key.value.clone());
    record
}

fn read_path(record: &Value, path: &PathChain) -> StoreResult<Option<Value>> {
    let mut current = record;
    for element in path {
        match current.get(literal_key(element)?) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current.clone()))
}

fn literal_key(element: &PathElement) -> StoreResult<&str> {
    match &element.key {
        PathKey::Attribute(name) => Ok(name.as_str()),
        PathKey::Placeholder(variable) => Err(StoreError::UnrenderedPlaceholder(variable.clone())),
    }
}

/// Value for a missing intermediate level
fn materialize(element: &PathElement) -> Value {
    match element.default_value() {
        Some(Value::Object(map)) => Value::Object(map),
        _ => Value::Object(Map::new()),
    }
}

fn conflict(path: &PathChain, element: &PathElement) -> StoreError {
    StoreError::PathConflict {
        path: path.to_path_string(),
        reason: format!("'{}' is not a map", element),
    }
}

fn set_path(record: &mut Map<String, Value>, path: &PathChain, value: Value) -> StoreResult<()> {
    let (last, parents) = path.elements().split_last().ok_or(StoreError::EmptyPath)?;

    let mut current = record;
    for element in parents {
        let entry = current
            .entry(literal_key(element)?.to_string())
            .or_insert_with(|| materialize(element));
        if entry.is_null() {
            *entry = materialize(element);
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return Err(conflict(path, element)),
        };
    }

    current.insert(literal_key(last)?.to_string(), value);
    Ok(())
}

fn remove_path(record: &mut Map<String, Value>, path: &PathChain) -> StoreResult<()> {
    let (last, parents) = path.elements().split_last().ok_or(StoreError::EmptyPath)?;

    let mut current = record;
    for element in parents {
        match current.get_mut(literal_key(element)?) {
            Some(Value::Object(map)) => current = map,
            _ => return Ok(()),
        }
    }

    current.remove(literal_key(last)?);
    Ok(())
}

//! Table binding
//!
//! A `Table` ties a compiled schema to one document store. Field requests
//! flow through a fixed sequence:
//!
//! 1. Resolve the path string in the registry
//! 2. Render placeholders from the query arguments
//! 3. Validate the value (writes)
//! 4. Forward to the store
//! 5. Validate the stored value (reads)
//!
//! Every step that fails aborts the request before the store is touched.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::errors::{TableError, TableResult};
use super::request::{FieldGetter, FieldRemover, FieldSetter, Setter, UnsafeFieldSetter};
use super::response::WriteReport;
use crate::config::EngineConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::path::{render, DefaultType, PathChain, PathElement, QueryArgs};
use crate::schema::{CompiledSchema, FieldDescriptor, ObjectSchema, SchemaCompiler};
use crate::store::{DocumentStore, RecordKey};
use crate::validation::{coerce_value, Validation, ValidationDetails, Validator};

/// Schema-checked access to the records of one table
pub struct Table<S: DocumentStore> {
    primary_key: String,
    compiled: Arc<CompiledSchema>,
    store: S,
}

impl<S: DocumentStore> Table<S> {
    /// Compiles `schema` with the default configuration and binds it to `store`.
    ///
    /// # Errors
    ///
    /// Returns `TableError::Schema` if the schema does not compile and
    /// `TableError::UnknownKeyField` if `primary_key` is not a top-level field.
    pub fn new(
        name: &str,
        primary_key: &str,
        schema: &Arc<ObjectSchema>,
        store: S,
    ) -> TableResult<Self> {
        Self::with_config(name, primary_key, schema, store, &EngineConfig::default())
    }

    pub fn with_config(
        name: &str,
        primary_key: &str,
        schema: &Arc<ObjectSchema>,
        store: S,
        config: &EngineConfig,
    ) -> TableResult<Self> {
        config.validate()?;
        let compiled = SchemaCompiler::new(config).compile(name, schema)?;
        Self::from_compiled(primary_key, Arc::new(compiled), store)
    }

    /// Binds an already compiled schema, shared with other tables.
    pub fn from_compiled(primary_key: &str, compiled: Arc<CompiledSchema>, store: S) -> TableResult<Self> {
        if compiled.schema().get(primary_key).is_none() {
            return Err(TableError::UnknownKeyField {
                key: primary_key.to_string(),
                table: compiled.table().to_string(),
            });
        }
        Ok(Self {
            primary_key: primary_key.to_string(),
            compiled,
            store,
        })
    }

    pub fn name(&self) -> &str {
        self.compiled.table()
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn compiled(&self) -> &Arc<CompiledSchema> {
        &self.compiled
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the descriptor registered for `path`
    pub fn descriptor(&self, path: &str) -> Option<&FieldDescriptor> {
        self.compiled.registry().get(path)
    }

    /// Reads and validates one field.
    ///
    /// An absent field yields an empty, unaccepted `Validation`.
    pub fn get(&self, key_value: impl Into<Value>, path: &str, args: &QueryArgs) -> TableResult<Validation> {
        let (descriptor, chain) = self.resolve(path, args)?;
        let key = self.record_key(key_value)?;

        log_event_with_fields(
            Event::StoreGet,
            &[("key", &key.to_string()), ("path", &chain.to_path_string()), ("table", self.name())],
        );
        match self.store.get_field(&key, &chain)? {
            Some(value) => Ok(self.validator().validate(&value, descriptor)?),
            None => Ok(Validation::default()),
        }
    }

    /// Reads several fields of one record in a single store call, keyed by alias.
    pub fn get_many(
        &self,
        key_value: impl Into<Value>,
        getters: &BTreeMap<String, FieldGetter>,
    ) -> TableResult<BTreeMap<String, Validation>> {
        let (aliases, paths) = self.resolve_getters(getters)?;
        let key = self.record_key(key_value)?;

        log_event_with_fields(
            Event::StoreGet,
            &[("count", &paths.len().to_string()), ("key", &key.to_string()), ("table", self.name())],
        );
        let values = self.store.get_fields(&key, &paths)?;
        self.validate_row(&aliases, values)
    }

    /// Reads the getters' fields from every record whose `key.name` field
    /// equals `key.value`, at most `limit` records.
    ///
    /// `key.name` may be any top-level field, not only the primary key.
    pub fn query(
        &self,
        key: &RecordKey,
        getters: &BTreeMap<String, FieldGetter>,
        limit: Option<usize>,
    ) -> TableResult<Vec<BTreeMap<String, Validation>>> {
        let (aliases, paths) = self.resolve_getters(getters)?;
        let key = self.checked_key(&key.name, key.value.clone())?;

        log_event_with_fields(
            Event::StoreQuery,
            &[("count", &paths.len().to_string()), ("key", &key.to_string()), ("table", self.name())],
        );
        self.store
            .query_by_key(&key, &paths, limit)?
            .into_iter()
            .map(|values| self.validate_row(&aliases, values))
            .collect()
    }

    /// Validates and writes one field.
    pub fn set(
        &self,
        key_value: impl Into<Value>,
        path: &str,
        value: Value,
        args: &QueryArgs,
    ) -> TableResult<WriteReport> {
        let setter = FieldSetter {
            path: path.to_string(),
            value,
            query_args: args.clone(),
        };
        self.set_many(key_value, &[Setter::Safe(setter)])
    }

    /// Writes one field below a registered path without validation.
    pub fn set_unsafe(&self, key_value: impl Into<Value>, setter: UnsafeFieldSetter) -> TableResult<WriteReport> {
        self.set_many(key_value, &[Setter::Unsafe(setter)])
    }

    /// Applies several setters in one store update.
    ///
    /// Values rejected as a whole are reported and skipped. A required field
    /// failure or any path error aborts the batch with nothing written.
    pub fn set_many(&self, key_value: impl Into<Value>, setters: &[Setter]) -> TableResult<WriteReport> {
        let validator = self.validator();
        let mut report = WriteReport::default();
        let mut updates = Vec::with_capacity(setters.len());

        for setter in setters {
            match setter {
                Setter::Safe(setter) => {
                    let (descriptor, chain) = self.resolve(&setter.path, &setter.query_args)?;
                    let Validation { value, warnings } = validator.validate(&setter.value, descriptor)?;
                    report.warnings.extend(warnings);
                    match value {
                        Some(value) => {
                            updates.push((chain, value));
                            report.applied.push(setter.path.clone());
                        }
                        None => report.rejected.push(setter.path.clone()),
                    }
                }
                Setter::Unsafe(setter) => {
                    let chain = self.resolve_unsafe(setter)?;
                    updates.push((chain, coerce_value(&setter.value, self.store.coercion())));
                    report.applied.push(setter.base_path.clone());
                }
            }
        }

        let key = self.record_key(key_value)?;
        if !updates.is_empty() {
            log_event_with_fields(
                Event::StoreSet,
                &[("count", &updates.len().to_string()), ("key", &key.to_string()), ("table", self.name())],
            );
            self.store.set_fields(&key, &updates)?;
        }
        Ok(report)
    }

    pub fn remove(&self, key_value: impl Into<Value>, path: &str, args: &QueryArgs) -> TableResult<()> {
        let remover = FieldRemover {
            path: path.to_string(),
            query_args: args.clone(),
        };
        self.remove_many(key_value, &[remover])
    }

    /// Removes several fields in one store update. An empty batch succeeds
    /// without calling the store.
    pub fn remove_many(&self, key_value: impl Into<Value>, removers: &[FieldRemover]) -> TableResult<()> {
        if removers.is_empty() {
            return Ok(());
        }

        let paths = removers
            .iter()
            .map(|remover| self.resolve(&remover.path, &remover.query_args).map(|(_, chain)| chain))
            .collect::<TableResult<Vec<_>>>()?;
        let key = self.record_key(key_value)?;

        log_event_with_fields(
            Event::StoreRemove,
            &[("count", &paths.len().to_string()), ("key", &key.to_string()), ("table", self.name())],
        );
        self.store.remove_fields(&key, &paths)?;
        Ok(())
    }

    /// Validates a whole record against the root schema and stores it.
    ///
    /// The stored key is taken from the validated record, so a key value
    /// dropped by validation fails the write. Returns the warnings for
    /// entries dropped from the record.
    pub fn put_record(&self, record: &Value) -> TableResult<Vec<ValidationDetails>> {
        let raw_key = match record.get(&self.primary_key) {
            None | Some(Value::Null) => return Err(TableError::MissingPrimaryKey(self.primary_key.clone())),
            Some(raw_key) => raw_key,
        };

        let Validation { value, warnings } = self.validator().validate_record(record, &self.compiled)?;
        // The root descriptor is required, so a mismatch is an error above
        let Some(value) = value else {
            return Err(TableError::MissingPrimaryKey(self.primary_key.clone()));
        };
        let key = match value.get(&self.primary_key) {
            Some(key_value @ (Value::String(_) | Value::Number(_))) => {
                RecordKey::new(&self.primary_key, key_value.clone())
            }
            _ => {
                return Err(TableError::InvalidKeyValue {
                    key: self.primary_key.clone(),
                    value: raw_key.to_string(),
                })
            }
        };

        log_event_with_fields(
            Event::RecordPut,
            &[
                ("dropped", &warnings.len().to_string()),
                ("key", &key.to_string()),
                ("table", self.name()),
            ],
        );
        self.store.put_record(&key, value)?;
        Ok(warnings)
    }

    /// Reads and validates a whole record
    pub fn get_record(&self, key_value: impl Into<Value>) -> TableResult<Validation> {
        match self.store.get_record(&self.record_key(key_value)?)? {
            Some(record) => Ok(self.validator().validate_record(&record, &self.compiled)?),
            None => Ok(Validation::default()),
        }
    }

    /// Deletes a record. The key name must be a top-level field of the schema
    /// and the value must have its declared type.
    ///
    /// Returns whether the record existed.
    pub fn delete_record(&self, key: &RecordKey) -> TableResult<bool> {
        let key = self.checked_key(&key.name, key.value.clone())?;

        log_event_with_fields(
            Event::RecordDelete,
            &[("key", &key.to_string()), ("table", self.name())],
        );
        Ok(self.store.delete_record(&key)?)
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(self.store.coercion())
    }

    fn record_key(&self, key_value: impl Into<Value>) -> TableResult<RecordKey> {
        self.checked_key(&self.primary_key, key_value.into())
    }

    /// Checks `value` against the declared type of the top-level field `name`.
    fn checked_key(&self, name: &str, value: Value) -> TableResult<RecordKey> {
        let Some(descriptor) = self.compiled.fields().iter().find(|d| d.name == name) else {
            return Err(TableError::UnknownKeyField {
                key: name.to_string(),
                table: self.name().to_string(),
            });
        };

        let descriptor = FieldDescriptor {
            required: false,
            ..descriptor.clone()
        };
        match self.validator().validate(&value, &descriptor)?.value {
            Some(checked @ (Value::String(_) | Value::Number(_))) => Ok(RecordKey::new(name, checked)),
            _ => Err(TableError::InvalidKeyValue {
                key: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn resolve_getters<'g>(
        &self,
        getters: &'g BTreeMap<String, FieldGetter>,
    ) -> TableResult<(Vec<(&'g str, &FieldDescriptor)>, Vec<PathChain>)> {
        let mut aliases = Vec::with_capacity(getters.len());
        let mut paths = Vec::with_capacity(getters.len());
        for (alias, getter) in getters {
            let (descriptor, chain) = self.resolve(&getter.path, &getter.query_args)?;
            aliases.push((alias.as_str(), descriptor));
            paths.push(chain);
        }
        Ok((aliases, paths))
    }

    /// Validates the values read for one record against their descriptors.
    fn validate_row(
        &self,
        aliases: &[(&str, &FieldDescriptor)],
        values: Vec<Option<Value>>,
    ) -> TableResult<BTreeMap<String, Validation>> {
        let validator = self.validator();
        let mut results = BTreeMap::new();
        for (&(alias, descriptor), value) in aliases.iter().zip(values) {
            let validation = match value {
                Some(value) => validator.validate(&value, descriptor)?,
                None => Validation::default(),
            };
            results.insert(alias.to_string(), validation);
        }
        Ok(results)
    }

    fn resolve(&self, path: &str, args: &QueryArgs) -> TableResult<(&FieldDescriptor, PathChain)> {
        let descriptor = self.compiled.registry().resolve(path)?;
        let chain = render(&descriptor.path, args)?;
        Ok((descriptor, chain))
    }

    /// Appends the raw continuation to the compiled base path, then renders.
    fn resolve_unsafe(&self, setter: &UnsafeFieldSetter) -> TableResult<PathChain> {
        let descriptor = self.compiled.registry().resolve(&setter.base_path)?;

        let last = setter.continuation.len().saturating_sub(1);
        let continuation = setter.continuation.iter().enumerate().map(|(i, key)| {
            let default_type = if i == last { DefaultType::Any } else { DefaultType::Map };
            PathElement::attribute(key, default_type)
        });
        let chain = descriptor.path.extended(continuation);
        chain.check_depth()?;

        Ok(render(&chain, &setter.query_args)?)
    }
}

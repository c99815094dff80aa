//! Recursive value validator
//!
//! Checks a value tree against a compiled field descriptor and returns the
//! pruned, coerced tree:
//! - required mismatches fail the whole operation
//! - optional mismatches drop the offending entry and report a warning
//! - undeclared object keys are dropped
//! - collection keys of the wrong key type are dropped
//! - list elements of the wrong element type are dropped
//!
//! The validator never mutates its input.

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::Arc;

use super::coercion::{coerce_value, NumericCoercion, PassThrough};
use super::errors::{ValidationDetails, ValidationError, ValidationResult};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{CompiledSchema, FieldDescriptor, FieldType, ObjectSchema};

/// Outcome of validating one value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Validation {
    /// The pruned value, or `None` if it was rejected as a whole
    pub value: Option<Value>,
    /// Optional mismatches that were dropped
    pub warnings: Vec<ValidationDetails>,
}

impl Validation {
    pub fn accepted(&self) -> bool {
        self.value.is_some()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}

/// Validates value trees against compiled descriptors
pub struct Validator<'a> {
    coercion: &'a dyn NumericCoercion,
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self { coercion: &PassThrough }
    }
}

impl<'a> Validator<'a> {
    pub fn new(coercion: &'a dyn NumericCoercion) -> Self {
        Self { coercion }
    }

    /// Validates `value` against the field described by `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a required field anywhere in the tree is
    /// missing or has the wrong type.
    pub fn validate(&self, value: &Value, descriptor: &FieldDescriptor) -> ValidationResult<Validation> {
        let mut warnings = Vec::new();
        let field = match descriptor.path_string() {
            path if path.is_empty() => "$root".to_string(),
            path => path,
        };

        let value = self.check(
            value,
            &descriptor.field_type,
            descriptor.required,
            &field,
            &mut warnings,
        )?;

        if value.is_none() {
            log_event_with_fields(
                Event::ValueRejected,
                &[("field", &field), ("table", &descriptor.table)],
            );
        }
        Ok(Validation { value, warnings })
    }

    /// Validates a whole record against the root schema of `compiled`.
    pub fn validate_record(&self, record: &Value, compiled: &CompiledSchema) -> ValidationResult<Validation> {
        self.validate(record, &compiled.root_descriptor())
    }

    fn check(
        &self,
        value: &Value,
        field_type: &FieldType,
        required: bool,
        field: &str,
        warnings: &mut Vec<ValidationDetails>,
    ) -> ValidationResult<Option<Value>> {
        let outcome = match (field_type, value) {
            (FieldType::Any, v) => Outcome::Accepted(coerce_value(v, self.coercion)),
            (FieldType::String, Value::String(_)) | (FieldType::Bool, Value::Bool(_)) => {
                Outcome::Accepted(value.clone())
            }
            (FieldType::Int, Value::Number(n)) if n.is_i64() || n.is_u64() => {
                Outcome::Accepted(self.coercion.coerce(n))
            }
            // Floats accept integers
            (FieldType::Float, Value::Number(n)) => Outcome::Accepted(self.coercion.coerce(n)),
            (FieldType::Map, Value::Object(_)) => {
                Outcome::Accepted(coerce_value(value, self.coercion))
            }
            (FieldType::List { element_type }, Value::Array(items)) => {
                Outcome::Accepted(self.check_list(items, element_type.as_deref(), field, warnings)?)
            }
            (FieldType::Object { model }, Value::Object(map)) => {
                Outcome::Accepted(self.check_object(map, model, field, warnings)?)
            }
            (FieldType::Dict { key_type, value_type }, Value::Object(map)) => {
                let mut items = Map::new();
                for (key, item) in map {
                    let item_field = join(field, key);
                    if !key_type.accepts(key) {
                        drop_entry(
                            ValidationDetails::key_type_mismatch(item_field, key_type.type_name(), key),
                            warnings,
                        );
                        continue;
                    }
                    if let Some(item) = self.check(item, value_type, false, &item_field, warnings)? {
                        items.insert(key.clone(), item);
                    }
                }
                Outcome::Accepted(Value::Object(items))
            }
            _ => Outcome::Mismatch(ValidationDetails::type_mismatch(
                field,
                field_type.type_name(),
                json_type_name(value),
            )),
        };

        match outcome {
            Outcome::Accepted(value) => Ok(Some(value)),
            Outcome::Mismatch(details) if required => {
                log_event_with_fields(
                    Event::RequiredFieldInvalid,
                    &[("actual", &details.actual), ("field", &details.field)],
                );
                Err(ValidationError::RequiredFieldInvalid(details))
            }
            Outcome::Mismatch(details) => {
                drop_entry(details, warnings);
                Ok(None)
            }
        }
    }

    fn check_object(
        &self,
        map: &Map<String, Value>,
        model: &Arc<ObjectSchema>,
        field: &str,
        warnings: &mut Vec<ValidationDetails>,
    ) -> ValidationResult<Value> {
        let mut validated = Map::new();

        for (key, value) in map {
            let child = join(field, key);
            let Some(decl) = model.get(key) else {
                drop_entry(ValidationDetails::unknown_field(child), warnings);
                continue;
            };
            let field_type = resolve_self_ref(&decl.field_type, model);
            if let Some(value) = self.check(value, &field_type, decl.required, &child, warnings)? {
                validated.insert(key.clone(), value);
            }
        }

        for decl in model.fields.iter().filter(|d| d.required) {
            if !map.contains_key(&decl.name) {
                let details = ValidationDetails::missing_field(join(field, &decl.name));
                log_event_with_fields(Event::RequiredFieldInvalid, &[("field", &details.field)]);
                return Err(ValidationError::RequiredFieldMissing(details));
            }
        }

        Ok(Value::Object(validated))
    }

    fn check_list(
        &self,
        items: &[Value],
        element_type: Option<&FieldType>,
        field: &str,
        warnings: &mut Vec<ValidationDetails>,
    ) -> ValidationResult<Value> {
        let Some(element_type) = element_type else {
            return Ok(Value::Array(
                items.iter().map(|v| coerce_value(v, self.coercion)).collect(),
            ));
        };

        let mut validated = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let element = format!("{}[{}]", field, i);
            if let Some(item) = self.check(item, element_type, false, &element, warnings)? {
                validated.push(item);
            }
        }
        Ok(Value::Array(validated))
    }
}

enum Outcome {
    Accepted(Value),
    Mismatch(ValidationDetails),
}

fn drop_entry(details: ValidationDetails, warnings: &mut Vec<ValidationDetails>) {
    log_event_with_fields(
        Event::FieldDropped,
        &[
            ("actual", &details.actual),
            ("expected", &details.expected),
            ("field", &details.field),
        ],
    );
    warnings.push(details);
}

/// `self_ref` items of a collection refer to the object that declares it
fn resolve_self_ref<'t>(field_type: &'t FieldType, owner: &Arc<ObjectSchema>) -> Cow<'t, FieldType> {
    match field_type {
        FieldType::Dict { key_type, value_type } if matches!(value_type.as_ref(), FieldType::SelfRef) => {
            Cow::Owned(FieldType::Dict {
                key_type: *key_type,
                value_type: Box::new(FieldType::object(Arc::clone(owner))),
            })
        }
        other => Cow::Borrowed(other),
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() || parent == "$root" {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Returns a human-readable type name for a JSON value.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

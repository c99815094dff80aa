//! Schema compiler
//!
//! Walks an [`ObjectSchema`] in declaration order and produces an immutable
//! [`CompiledSchema`]: the flat path registry plus the top-level field
//! descriptors.
//!
//! Rules per field:
//! - scalar: one attribute element, registered
//! - object: one attribute element, then the nested schema under it
//! - dict: attribute element, then a `$key:<key_name>` placeholder item,
//!   registered as `<field>.{{<key_name>}}`; object items are compiled under
//!   the item path
//! - dict with an indexed key name (`slot{i}`): unrolled into
//!   `max_nested_depth` nested levels, one placeholder per index
//!
//! A path longer than [`MAX_PATH_DEPTH`] is never registered and its subtree
//! is not compiled. In strict mode this aborts compilation instead.

use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::registry::{FieldDescriptor, PathRegistry};
use super::types::{FieldDecl, FieldType, ObjectSchema};
use crate::config::EngineConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::path::{PathChain, PathElement, MAX_PATH_DEPTH};

/// Marker of an indexed key name
pub const INDEX_PLACEHOLDER: &str = "{i}";

/// Characters that may not appear in literal field names
pub const RESERVED_CHARACTERS: [char; 4] = ['[', ']', '{', '}'];

/// A path that was excluded from the registry for exceeding the ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: String,
    pub depth: usize,
}

/// Output of schema compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    table: String,
    schema: Arc<ObjectSchema>,
    registry: PathRegistry,
    fields: Vec<FieldDescriptor>,
    skipped: Vec<SkippedPath>,
}

impl CompiledSchema {
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the schema this was compiled from
    pub fn schema(&self) -> &Arc<ObjectSchema> {
        &self.schema
    }

    pub fn registry(&self) -> &PathRegistry {
        &self.registry
    }

    /// Top-level descriptors in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Paths excluded for exceeding the nesting ceiling
    pub fn skipped(&self) -> &[SkippedPath] {
        &self.skipped
    }

    /// Descriptor of the whole record, used to validate full documents.
    ///
    /// Its path is empty; it is never registered.
    pub fn root_descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: String::new(),
            field_type: FieldType::object(Arc::clone(&self.schema)),
            required: true,
            key_name: None,
            item_type: None,
            path: PathChain::root(),
            table: self.table.clone(),
        }
    }
}

/// Mutable state of one compilation run
struct CompileState<'a> {
    table: &'a str,
    strict_depth: bool,
    registry: PathRegistry,
    skipped: Vec<SkippedPath>,
}

impl CompileState<'_> {
    /// Registers `descriptor`. Returns false if it was skipped for depth.
    fn register(&mut self, descriptor: FieldDescriptor) -> SchemaResult<bool> {
        let depth = descriptor.path.len();
        if depth > MAX_PATH_DEPTH {
            let path = descriptor.path_string();
            if self.strict_depth {
                return Err(SchemaError::PathTooDeep {
                    path,
                    depth,
                    max: MAX_PATH_DEPTH,
                });
            }
            log_event_with_fields(
                Event::PathSkipped,
                &[
                    ("depth", &depth.to_string()),
                    ("path", &path),
                    ("table", self.table),
                ],
            );
            self.skipped.push(SkippedPath { path, depth });
            return Ok(false);
        }
        self.registry.insert(descriptor)?;
        Ok(true)
    }
}

/// Compiles schemas into path registries
#[derive(Debug, Clone)]
pub struct SchemaCompiler {
    max_nested_depth: usize,
    strict_depth: bool,
}

impl Default for SchemaCompiler {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl SchemaCompiler {
    /// Creates a compiler using the nesting settings of `config`.
    ///
    /// `config` is expected to have passed [`EngineConfig::validate`].
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_nested_depth: config.max_nested_depth,
            strict_depth: config.strict_depth,
        }
    }

    /// Compiles `schema` for `table` with top-level fields at the document root.
    pub fn compile(&self, table: &str, schema: &Arc<ObjectSchema>) -> SchemaResult<CompiledSchema> {
        self.compile_at(table, schema, &PathChain::root())
    }

    /// Compiles `schema` with every path prefixed by `prefix`.
    pub fn compile_at(
        &self,
        table: &str,
        schema: &Arc<ObjectSchema>,
        prefix: &PathChain,
    ) -> SchemaResult<CompiledSchema> {
        log_event_with_fields(
            Event::SchemaCompileBegin,
            &[("schema", &schema.name), ("table", table)],
        );

        let mut state = CompileState {
            table,
            strict_depth: self.strict_depth,
            registry: PathRegistry::new(),
            skipped: Vec::new(),
        };
        let fields = self.compile_object(&mut state, schema, prefix, false)?;

        let CompileState { registry, skipped, .. } = state;
        log_event_with_fields(
            Event::SchemaCompileComplete,
            &[
                ("paths", &registry.len().to_string()),
                ("schema", &schema.name),
                ("skipped", &skipped.len().to_string()),
                ("table", table),
            ],
        );

        Ok(CompiledSchema {
            table: table.to_string(),
            schema: Arc::clone(schema),
            registry,
            fields,
            skipped,
        })
    }

    /// Compiles every field of `schema` under `prefix`.
    ///
    /// Inside an unrolled subtree (`nested`), indexed collections are
    /// registered but not unrolled again.
    fn compile_object(
        &self,
        state: &mut CompileState<'_>,
        schema: &Arc<ObjectSchema>,
        prefix: &PathChain,
        nested: bool,
    ) -> SchemaResult<Vec<FieldDescriptor>> {
        let mut descriptors = Vec::with_capacity(schema.fields.len());

        for field in &schema.fields {
            check_field_name(&schema.name, &field.name)?;
            let key_name = self.resolve_key_name(field)?;
            let field_type = resolve_self_ref(&field.field_type, schema, &field.name)?;
            let item_type = match &field_type {
                FieldType::Dict { value_type, .. } => Some(value_type.as_ref().clone()),
                _ => None,
            };

            let element = PathElement::attribute(&field.name, field_type.default_type())
                .with_default(field.default_value.clone());
            let chain = prefix.child(element);

            let descriptor = FieldDescriptor {
                name: field.name.clone(),
                field_type: field_type.clone(),
                required: field.required,
                key_name: key_name.clone(),
                item_type: item_type.clone(),
                path: chain.clone(),
                table: state.table.to_string(),
            };
            if !state.register(descriptor.clone())? {
                continue;
            }
            descriptors.push(descriptor);

            match (&field_type, key_name, item_type) {
                (FieldType::Object { model }, _, _) => {
                    self.compile_object(state, model, &chain, nested)?;
                }
                (FieldType::Dict { .. }, Some(key_name), Some(item_type)) => {
                    if key_name.contains(INDEX_PLACEHOLDER) {
                        if !nested {
                            self.unroll_collection(state, field, &key_name, &item_type, &chain)?;
                        }
                    } else {
                        self.compile_item(state, &key_name, &item_type, &chain, nested)?;
                    }
                }
                _ => {}
            }
        }

        Ok(descriptors)
    }

    /// Registers the placeholder item of a keyed collection and compiles
    /// object items under it. Primitive items are a single scalar location.
    fn compile_item(
        &self,
        state: &mut CompileState<'_>,
        key_name: &str,
        item_type: &FieldType,
        collection: &PathChain,
        nested: bool,
    ) -> SchemaResult<()> {
        let chain = collection.child(PathElement::placeholder(key_name, item_type.default_type()));
        if !state.register(item_descriptor(state.table, key_name, item_type, &chain))? {
            return Ok(());
        }
        if let FieldType::Object { model } = item_type {
            self.compile_object(state, model, &chain, nested)?;
        }
        Ok(())
    }

    /// Unrolls an indexed collection into nested levels:
    /// `field.{{key0}}`, `field.{{key0}}.field.{{key1}}`, ...
    ///
    /// The store cannot match wildcard paths, so every level is registered
    /// up front. Unrolling stops at the first level that exceeds the ceiling.
    /// Item schemas are compiled without unrolling their own indexed fields.
    fn unroll_collection(
        &self,
        state: &mut CompileState<'_>,
        field: &FieldDecl,
        key_name: &str,
        item_type: &FieldType,
        collection: &PathChain,
    ) -> SchemaResult<()> {
        let levels = field.max_nested_depth.unwrap_or(self.max_nested_depth);
        let Some(field_element) = collection.last().cloned() else {
            return Ok(());
        };

        let mut chain = collection.clone();
        for index in 0..levels {
            let level_key = key_name.replace(INDEX_PLACEHOLDER, &index.to_string());
            let item_chain =
                chain.child(PathElement::placeholder(&level_key, item_type.default_type()));

            if !state.register(item_descriptor(state.table, &level_key, item_type, &item_chain))? {
                break;
            }

            if let FieldType::Object { model } = item_type {
                self.compile_object(state, model, &item_chain, true)?;
            }

            chain = item_chain.child(field_element.clone());
        }
        Ok(())
    }

    /// Validates key name usage and applies the `<name>Key` default.
    fn resolve_key_name(&self, field: &FieldDecl) -> SchemaResult<Option<String>> {
        if let Some(depth) = field.max_nested_depth {
            if depth == 0 || depth > MAX_PATH_DEPTH {
                return Err(SchemaError::InvalidMaxNestedDepth {
                    field: field.name.clone(),
                    value: depth,
                    max: MAX_PATH_DEPTH,
                });
            }
        }

        match (&field.field_type, &field.key_name) {
            (FieldType::Dict { value_type, .. }, key_name) => {
                let key_name = key_name
                    .clone()
                    .unwrap_or_else(|| format!("{}Key", field.name));
                check_key_name(&field.name, &key_name)?;
                if matches!(value_type.as_ref(), FieldType::SelfRef)
                    && !key_name.contains(INDEX_PLACEHOLDER)
                {
                    return Err(SchemaError::UnboundedRecursion {
                        field: field.name.clone(),
                    });
                }
                Ok(Some(key_name))
            }
            (other, Some(key_name)) => Err(SchemaError::InvalidKeyNameUsage {
                field: field.name.clone(),
                key_name: key_name.clone(),
                field_type: other.type_name(),
            }),
            (_, None) => Ok(None),
        }
    }
}

fn item_descriptor(
    table: &str,
    key_name: &str,
    item_type: &FieldType,
    chain: &PathChain,
) -> FieldDescriptor {
    FieldDescriptor {
        name: key_name.to_string(),
        field_type: item_type.clone(),
        required: false,
        key_name: None,
        item_type: None,
        path: chain.clone(),
        table: table.to_string(),
    }
}

/// Rejects empty names and names containing `[`, `]`, `{` or `}`.
fn check_field_name(schema: &str, name: &str) -> SchemaResult<()> {
    if name.is_empty() {
        return Err(SchemaError::InvalidFieldName {
            schema: schema.to_string(),
            name: name.to_string(),
            reason: "name is empty".into(),
        });
    }
    if let Some(c) = name.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
        return Err(SchemaError::InvalidFieldName {
            schema: schema.to_string(),
            name: name.to_string(),
            reason: format!("contains reserved character '{}'", c),
        });
    }
    Ok(())
}

/// Key names follow field name rules, except for the `{i}` index marker.
fn check_key_name(field: &str, key_name: &str) -> SchemaResult<()> {
    let literal = key_name.replace(INDEX_PLACEHOLDER, "");
    if literal.is_empty() {
        return Err(SchemaError::InvalidKeyName {
            field: field.to_string(),
            key_name: key_name.to_string(),
            reason: "name is empty".into(),
        });
    }
    if let Some(c) = literal.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
        return Err(SchemaError::InvalidKeyName {
            field: field.to_string(),
            key_name: key_name.to_string(),
            reason: format!("contains reserved character '{}'", c),
        });
    }
    Ok(())
}

/// Replaces a dict's `self_ref` value type with the enclosing schema.
///
/// `self_ref` is only valid as the direct value type of a dict.
fn resolve_self_ref(
    field_type: &FieldType,
    owner: &Arc<ObjectSchema>,
    field: &str,
) -> SchemaResult<FieldType> {
    let invalid = || SchemaError::InvalidSelfRef {
        field: field.to_string(),
    };
    match field_type {
        FieldType::Dict { key_type, value_type } => match value_type.as_ref() {
            FieldType::SelfRef => Ok(FieldType::Dict {
                key_type: *key_type,
                value_type: Box::new(FieldType::object(Arc::clone(owner))),
            }),
            nested if contains_self_ref(nested) => Err(invalid()),
            _ => Ok(field_type.clone()),
        },
        other if contains_self_ref(other) => Err(invalid()),
        other => Ok(other.clone()),
    }
}

fn contains_self_ref(field_type: &FieldType) -> bool {
    match field_type {
        FieldType::SelfRef => true,
        FieldType::List { element_type: Some(element) } => contains_self_ref(element),
        FieldType::Dict { value_type, .. } => contains_self_ref(value_type),
        _ => false,
    }
}

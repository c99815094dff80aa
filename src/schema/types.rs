//! Schema type definitions
//!
//! Supported types:
//! - any: untyped value
//! - string, int, float, bool: primitives
//! - list: array with optional element type
//! - map: untyped object
//! - object: nested schema with its own fields
//! - dict: keyed collection whose keys are supplied at request time
//! - self_ref: the enclosing object schema, only valid as a dict value type
//!
//! Schemas are plain data: they are built in code or deserialized from JSON,
//! and are never modified by compilation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::path::DefaultType;

/// Type of dictionary keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Any key
    #[default]
    String,
    /// Keys must parse as 64-bit signed integers
    Int,
}

impl KeyType {
    /// Returns whether `key` is a valid key of this type
    pub fn accepts(&self, key: &str) -> bool {
        match self {
            KeyType::String => true,
            KeyType::Int => key.parse::<i64>().is_ok(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::Int => "int",
        }
    }
}

/// Supported field types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Any,
    String,
    Int,
    Float,
    Bool,
    /// Array, optionally homogeneous
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element_type: Option<Box<FieldType>>,
    },
    /// Untyped object
    Map,
    /// Nested schema
    Object { model: Arc<ObjectSchema> },
    /// Keyed collection
    Dict {
        #[serde(default)]
        key_type: KeyType,
        value_type: Box<FieldType>,
    },
    /// The enclosing object schema
    SelfRef,
}

impl FieldType {
    /// Nested schema type
    pub fn object(model: Arc<ObjectSchema>) -> Self {
        FieldType::Object { model }
    }

    /// String-keyed collection
    pub fn dict(value_type: FieldType) -> Self {
        FieldType::Dict {
            key_type: KeyType::String,
            value_type: Box::new(value_type),
        }
    }

    /// Collection with an explicit key type
    pub fn dict_keyed(key_type: KeyType, value_type: FieldType) -> Self {
        FieldType::Dict {
            key_type,
            value_type: Box::new(value_type),
        }
    }

    /// Homogeneous list
    pub fn list_of(element_type: FieldType) -> Self {
        FieldType::List {
            element_type: Some(Box::new(element_type)),
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Any => "any",
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::List { .. } => "list",
            FieldType::Map => "map",
            FieldType::Object { .. } => "object",
            FieldType::Dict { .. } => "dict",
            FieldType::SelfRef => "self_ref",
        }
    }

    /// Returns the storage type tag used for path elements
    pub fn default_type(&self) -> DefaultType {
        match self {
            FieldType::Any => DefaultType::Any,
            FieldType::String => DefaultType::String,
            FieldType::Int => DefaultType::Int,
            FieldType::Float => DefaultType::Float,
            FieldType::Bool => DefaultType::Bool,
            FieldType::List { .. } => DefaultType::List,
            FieldType::Map
            | FieldType::Object { .. }
            | FieldType::Dict { .. }
            | FieldType::SelfRef => DefaultType::Map,
        }
    }
}

/// Field declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Attribute name in the stored document
    pub name: String,
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether a value must be present and well-typed
    #[serde(default)]
    pub required: bool,
    /// Query variable naming the keys of a dict field.
    /// Defaults to `<name>Key`; a `{i}` marks an indexed collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    /// Custom default carried on the field's path element
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Unroll depth of an indexed collection, overriding the engine default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nested_depth: Option<usize>,
}

impl FieldDecl {
    /// Create an optional field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            key_name: None,
            default_value: None,
            max_nested_depth: None,
        }
    }

    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Any)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Map)
    }

    pub fn list(name: impl Into<String>, element_type: Option<FieldType>) -> Self {
        Self::new(
            name,
            FieldType::List {
                element_type: element_type.map(Box::new),
            },
        )
    }

    pub fn object(name: impl Into<String>, model: Arc<ObjectSchema>) -> Self {
        Self::new(name, FieldType::object(model))
    }

    pub fn dict(name: impl Into<String>, value_type: FieldType) -> Self {
        Self::new(name, FieldType::dict(value_type))
    }

    /// Marks the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn max_nested_depth(mut self, depth: usize) -> Self {
        self.max_nested_depth = Some(depth);
        self
    }
}

/// Object schema: an ordered list of field declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Schema name, used in diagnostics and by the loader
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field declarations in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl ObjectSchema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Appends a field declaration
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps the schema for sharing between fields and compiled tables
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the declaration of the named field
    pub fn get(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project_schema() -> Arc<ObjectSchema> {
        ObjectSchema::new("Project")
            .field(FieldDecl::string("name").required())
            .field(FieldDecl::int("priority"))
            .shared()
    }

    #[test]
    fn test_builder_keeps_declaration_order() {
        let schema = ObjectSchema::new("User")
            .field(FieldDecl::string("id").required())
            .field(FieldDecl::dict("projects", FieldType::object(project_schema())).key_name("projectId"));

        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "projects"]);
        assert!(schema.get("id").unwrap().required);
        assert_eq!(schema.get("projects").unwrap().key_name.as_deref(), Some("projectId"));
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn test_default_types() {
        assert_eq!(FieldType::String.default_type(), DefaultType::String);
        assert_eq!(FieldType::Any.default_type(), DefaultType::Any);
        assert_eq!(FieldType::dict(FieldType::Int).default_type(), DefaultType::Map);
        assert_eq!(FieldType::object(project_schema()).default_type(), DefaultType::Map);
        assert_eq!(FieldType::list_of(FieldType::Int).default_type(), DefaultType::List);
    }

    #[test]
    fn test_key_type_accepts() {
        assert!(KeyType::String.accepts("anything"));
        assert!(KeyType::Int.accepts("42"));
        assert!(KeyType::Int.accepts("-7"));
        assert!(!KeyType::Int.accepts("p1"));
    }

    #[test]
    fn test_deserialize_from_json() {
        let schema: ObjectSchema = serde_json::from_value(json!({
            "name": "User",
            "fields": [
                {"name": "id", "type": "string", "required": true},
                {"name": "score", "type": "float", "default": 1.5},
                {"name": "projects", "type": "dict", "key_name": "projectId",
                 "value_type": {"type": "object", "model": {
                    "name": "Project",
                    "fields": [{"name": "name", "type": "string", "required": true}]
                 }}},
                {"name": "children", "type": "dict", "key_name": "childId{i}",
                 "key_type": "string", "value_type": {"type": "self_ref"}, "max_nested_depth": 3},
                {"name": "tags", "type": "list", "element_type": {"type": "string"}}
            ]
        }))
        .unwrap();

        assert_eq!(schema.fields.len(), 5);
        assert_eq!(schema.fields[0].field_type, FieldType::String);
        assert!(schema.fields[0].required);
        assert_eq!(schema.fields[1].default_value, Some(json!(1.5)));
        match &schema.fields[2].field_type {
            FieldType::Dict { key_type, value_type } => {
                assert_eq!(*key_type, KeyType::String);
                assert_eq!(value_type.type_name(), "object");
            }
            other => panic!("unexpected type {:?}", other),
        }
        assert_eq!(schema.fields[3].max_nested_depth, Some(3));
        assert_eq!(schema.fields[4].field_type, FieldType::list_of(FieldType::String));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldType::String.type_name(), "string");
        assert_eq!(FieldType::SelfRef.type_name(), "self_ref");
        assert_eq!(FieldType::dict(FieldType::Any).type_name(), "dict");
        assert_eq!(FieldType::Map.type_name(), "map");
    }
}

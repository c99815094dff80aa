//! Path elements
//!
//! A path element is one segment of a nested document address. Its key is
//! either a literal attribute name or a placeholder (`$key:<variable>`) that is
//! substituted with a caller-supplied value at request time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Textual prefix of a placeholder key
pub const PLACEHOLDER_PREFIX: &str = "$key:";

/// Semantic type tag of the value stored under a path element.
///
/// Used by stores to materialize missing intermediate levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultType {
    /// Untyped; the zero value is absence
    Any,
    String,
    Int,
    Float,
    Bool,
    List,
    Map,
}

impl DefaultType {
    /// Returns the zero value of this type, or `None` for untyped elements.
    pub fn zero_value(&self) -> Option<Value> {
        match self {
            DefaultType::Any => None,
            DefaultType::String => Some(Value::String(String::new())),
            DefaultType::Int => Some(Value::from(0)),
            DefaultType::Float => Some(Value::from(0.0)),
            DefaultType::Bool => Some(Value::Bool(false)),
            DefaultType::List => Some(Value::Array(Vec::new())),
            DefaultType::Map => Some(Value::Object(Map::new())),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DefaultType::Any => "any",
            DefaultType::String => "string",
            DefaultType::Int => "int",
            DefaultType::Float => "float",
            DefaultType::Bool => "bool",
            DefaultType::List => "list",
            DefaultType::Map => "map",
        }
    }
}

/// Key of a path element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum PathKey {
    /// Literal attribute name
    Attribute(String),
    /// Runtime-substituted dictionary key, named by its query variable
    Placeholder(String),
}

impl PathKey {
    /// Returns the attribute name or the placeholder variable name
    pub fn name(&self) -> &str {
        match self {
            PathKey::Attribute(name) | PathKey::Placeholder(name) => name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PathKey::Placeholder(_))
    }

    /// Returns the segment used in human-facing path strings:
    /// `name` for attributes, `{{variable}}` for placeholders.
    pub fn path_segment(&self) -> String {
        match self {
            PathKey::Attribute(name) => name.clone(),
            PathKey::Placeholder(variable) => format!("{{{{{}}}}}", variable),
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Attribute(name) => write!(f, "{}", name),
            PathKey::Placeholder(variable) => write!(f, "{}{}", PLACEHOLDER_PREFIX, variable),
        }
    }
}

/// One segment of a database path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    pub key: PathKey,
    pub default_type: DefaultType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl PathElement {
    /// Creates a literal attribute element
    pub fn attribute(name: impl Into<String>, default_type: DefaultType) -> Self {
        Self {
            key: PathKey::Attribute(name.into()),
            default_type,
            default_value: None,
        }
    }

    /// Creates a placeholder element for the given query variable
    pub fn placeholder(variable: impl Into<String>, default_type: DefaultType) -> Self {
        Self {
            key: PathKey::Placeholder(variable.into()),
            default_type,
            default_value: None,
        }
    }

    /// Sets a custom default value
    pub fn with_default(mut self, value: Option<Value>) -> Self {
        self.default_value = value;
        self
    }

    /// Resolves the default value: the custom default if set, otherwise the
    /// zero value of the element type.
    pub fn default_value(&self) -> Option<Value> {
        match &self.default_value {
            Some(value) => Some(value.clone()),
            None => self.default_type.zero_value(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.key.is_placeholder()
    }

    /// Returns a copy keyed by the given literal, keeping type and default.
    pub fn rendered(&self, literal: impl Into<String>) -> Self {
        Self {
            key: PathKey::Attribute(literal.into()),
            default_type: self.default_type,
            default_value: self.default_value.clone(),
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

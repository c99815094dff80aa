//! Table request records
//!
//! Every request names a registered field path (for example
//! `projects.{{projectId}}.name`) and supplies the query arguments that fill
//! its placeholders. Requests deserialize from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::QueryArgs;

/// Read one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGetter {
    pub path: String,
    #[serde(default)]
    pub query_args: QueryArgs,
}

impl FieldGetter {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query_args: QueryArgs::new(),
        }
    }

    /// Adds a query argument
    pub fn arg(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_args.insert(variable, value);
        self
    }
}

/// Validated write of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSetter {
    pub path: String,
    pub value: Value,
    #[serde(default)]
    pub query_args: QueryArgs,
}

impl FieldSetter {
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
            query_args: QueryArgs::new(),
        }
    }

    pub fn arg(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_args.insert(variable, value);
        self
    }
}

/// Unvalidated write below a registered field.
///
/// The target is `base_path` followed by the literal `continuation` keys.
/// Only numeric coercion is applied to `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsafeFieldSetter {
    pub base_path: String,
    #[serde(default)]
    pub continuation: Vec<String>,
    pub value: Value,
    #[serde(default)]
    pub query_args: QueryArgs,
}

impl UnsafeFieldSetter {
    pub fn new(base_path: impl Into<String>, continuation: Vec<String>, value: Value) -> Self {
        Self {
            base_path: base_path.into(),
            continuation,
            value,
            query_args: QueryArgs::new(),
        }
    }

    pub fn arg(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_args.insert(variable, value);
        self
    }
}

/// Remove one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRemover {
    pub path: String,
    #[serde(default)]
    pub query_args: QueryArgs,
}

impl FieldRemover {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query_args: QueryArgs::new(),
        }
    }

    pub fn arg(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_args.insert(variable, value);
        self
    }
}

/// Either kind of setter, for batched writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Setter {
    Safe(FieldSetter),
    Unsafe(UnsafeFieldSetter),
}

impl Setter {
    /// Returns the path string the setter was declared with
    pub fn path(&self) -> &str {
        match self {
            Setter::Safe(setter) => &setter.path,
            Setter::Unsafe(setter) => &setter.base_path,
        }
    }
}

impl From<FieldSetter> for Setter {
    fn from(setter: FieldSetter) -> Self {
        Setter::Safe(setter)
    }
}

impl From<UnsafeFieldSetter> for Setter {
    fn from(setter: UnsafeFieldSetter) -> Self {
        Setter::Unsafe(setter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_args() {
        let getter = FieldGetter::new("projects.{{projectId}}.name").arg("projectId", "p1");
        assert_eq!(getter.query_args.get("projectId"), Some("p1"));
    }

    #[test]
    fn test_parse_setters() {
        let setters: Vec<Setter> = serde_json::from_value(json!([
            {"kind": "safe", "path": "name", "value": "Alice"},
            {"kind": "unsafe", "base_path": "projects.{{projectId}}", "continuation": ["meta", "color"],
             "value": "red", "query_args": {"projectId": "p1"}}
        ]))
        .unwrap();

        assert_eq!(setters[0], Setter::Safe(FieldSetter::new("name", json!("Alice"))));
        match &setters[1] {
            Setter::Unsafe(setter) => {
                assert_eq!(setter.continuation, vec!["meta", "color"]);
                assert_eq!(setter.query_args.get("projectId"), Some("p1"));
            }
            other => panic!("Expected unsafe setter, got {:?}", other),
        }
        assert_eq!(setters[1].path(), "projects.{{projectId}}");
    }

    #[test]
    fn test_missing_query_args_default_to_empty() {
        let remover: FieldRemover = serde_json::from_value(json!({"path": "name"})).unwrap();
        assert!(remover.query_args.is_empty());
    }
}

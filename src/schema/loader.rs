//! Schema loader for reading object schemas from disk
//!
//! - One JSON file per schema, named `<schema name>.json`
//! - Every loaded schema is compiled once to reject invalid declarations
//! - Schema names are unique; registering a name twice fails

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::compiler::SchemaCompiler;
use super::errors::{SchemaError, SchemaResult};
use super::types::ObjectSchema;
use crate::observability::{log_event_with_fields, Event};

/// Reads schema files from a directory and keeps them by name.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Compiler used to check loaded schemas
    compiler: SchemaCompiler,
    /// Loaded schemas indexed by name
    schemas: BTreeMap<String, Arc<ObjectSchema>>,
}

impl SchemaLoader {
    /// Creates a loader for `schema_dir` with the default compiler settings.
    pub fn new(schema_dir: &Path) -> Self {
        Self::with_compiler(schema_dir, SchemaCompiler::default())
    }

    pub fn with_compiler(schema_dir: &Path, compiler: SchemaCompiler) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            compiler,
            schemas: BTreeMap::new(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory loads nothing. Any unreadable, malformed or
    /// invalid file fails the whole load.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir)
            .map_err(|e| malformed(&self.schema_dir, format!("Failed to read directory: {}", e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| malformed(&self.schema_dir, format!("Failed to read entry: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Directory order is platform-dependent
        paths.sort();

        for path in &paths {
            self.load_schema_file(path)?;
        }

        log_event_with_fields(
            Event::SchemasLoaded,
            &[
                ("count", &paths.len().to_string()),
                ("dir", &self.schema_dir.display().to_string()),
            ],
        );
        Ok(paths.len())
    }

    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| malformed(path, format!("Failed to read file: {}", e)))?;

        let schema: ObjectSchema = serde_json::from_str(&content)
            .map_err(|e| malformed(path, format!("Invalid JSON: {}", e)))?;

        self.register(schema)
    }

    /// Registers a schema after checking that it compiles.
    pub fn register(&mut self, schema: ObjectSchema) -> SchemaResult<()> {
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::AlreadyRegistered(schema.name));
        }

        let schema = schema.shared();
        self.compiler.compile(&schema.name, &schema)?;
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ObjectSchema>> {
        self.schemas.get(name).cloned()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns all loaded schemas in name order.
    pub fn all_schemas(&self) -> impl Iterator<Item = &Arc<ObjectSchema>> {
        self.schemas.values()
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Writes `schema` to `<schema_dir>/<name>.json`.
    ///
    /// Existing files are never overwritten.
    pub fn save_schema(&self, schema: &ObjectSchema) -> SchemaResult<PathBuf> {
        let path = self.schema_dir.join(format!("{}.json", schema.name));
        if path.exists() {
            return Err(SchemaError::AlreadyRegistered(schema.name.clone()));
        }

        fs::create_dir_all(&self.schema_dir)
            .map_err(|e| malformed(&self.schema_dir, format!("Failed to create directory: {}", e)))?;

        let content = serde_json::to_string_pretty(schema)
            .map_err(|e| malformed(&path, format!("Failed to serialize schema: {}", e)))?;

        fs::write(&path, content).map_err(|e| malformed(&path, format!("Failed to write file: {}", e)))?;

        Ok(path)
    }
}

fn malformed(path: &Path, reason: String) -> SchemaError {
    SchemaError::Malformed {
        path: path.display().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{FieldDecl, FieldType};
    use tempfile::TempDir;

    fn sample_schema() -> ObjectSchema {
        ObjectSchema::new("User")
            .field(FieldDecl::string("id").required())
            .field(FieldDecl::dict("scores", FieldType::Int).key_name("game"))
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema()).unwrap();

        let schema = loader.get("User").unwrap();
        assert_eq!(schema.fields.len(), 2);
        assert!(loader.exists("User"));
    }

    #[test]
    fn test_duplicate_registration() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema()).unwrap();
        let err = loader.register(sample_schema()).unwrap_err();
        assert_eq!(err.code(), "STRUCTPATH_SCHEMA_ALREADY_REGISTERED");
    }

    #[test]
    fn test_register_rejects_invalid_schema() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        let bad = ObjectSchema::new("Bad").field(FieldDecl::string("a{b}"));
        assert!(matches!(
            loader.register(bad),
            Err(SchemaError::InvalidFieldName { .. })
        ));
        assert_eq!(loader.schema_count(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());
        let path = loader.save_schema(&sample_schema()).unwrap();
        assert!(path.ends_with("User.json"));

        let mut reloaded = SchemaLoader::new(temp_dir.path());
        assert_eq!(reloaded.load_all().unwrap(), 1);
        assert_eq!(*reloaded.get("User").unwrap(), sample_schema());
    }

    #[test]
    fn test_save_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());
        loader.save_schema(&sample_schema()).unwrap();
        assert!(loader.save_schema(&sample_schema()).is_err());
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), "STRUCTPATH_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(&temp_dir.path().join("absent"));
        assert_eq!(loader.load_all().unwrap(), 0);
        assert!(loader.get("User").is_none());
    }
}

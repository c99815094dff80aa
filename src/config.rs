//! Engine configuration
//!
//! Loaded from a JSON file or built in code. Every field has a default, so an
//! empty object (`{}`) is a valid configuration.
//!
//! ```json
//! {
//!   "max_nested_depth": 32,
//!   "strict_depth": false,
//!   "numeric_scale": 6
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};
use crate::path::MAX_PATH_DEPTH;
use crate::validation::{FixedPoint, NumericCoercion, PassThrough};

/// Largest scale supported by the fixed-point coercion
pub const MAX_NUMERIC_SCALE: u32 = 28;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "STRUCTPATH_CONFIG_READ_FAILED",
            ConfigError::Parse(_) => "STRUCTPATH_CONFIG_INVALID_JSON",
            ConfigError::Invalid(_) => "STRUCTPATH_CONFIG_INVALID",
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of levels an indexed (`{i}`) collection is unrolled into,
    /// unless the field overrides it (default 32)
    #[serde(default = "default_max_nested_depth")]
    pub max_nested_depth: usize,

    /// Abort compilation when a path exceeds the nesting ceiling instead of
    /// skipping it (default false)
    #[serde(default)]
    pub strict_depth: bool,

    /// Decimal places kept by the fixed-point numeric coercion; `None`
    /// passes numbers through unchanged
    #[serde(default)]
    pub numeric_scale: Option<u32>,
}

fn default_max_nested_depth() -> usize {
    MAX_PATH_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nested_depth: default_max_nested_depth(),
            strict_depth: false,
            numeric_scale: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("path", &path.display().to_string()),
                ("max_nested_depth", &config.max_nested_depth.to_string()),
            ],
        );

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_nested_depth == 0 || self.max_nested_depth > MAX_PATH_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "max_nested_depth must be between 1 and {}, got {}",
                MAX_PATH_DEPTH, self.max_nested_depth
            )));
        }

        if let Some(scale) = self.numeric_scale {
            if scale > MAX_NUMERIC_SCALE {
                return Err(ConfigError::Invalid(format!(
                    "numeric_scale must be at most {}, got {}",
                    MAX_NUMERIC_SCALE, scale
                )));
            }
        }

        Ok(())
    }

    /// Returns the numeric coercion selected by `numeric_scale`
    pub fn coercion(&self) -> Box<dyn NumericCoercion> {
        match self.numeric_scale {
            Some(scale) => Box::new(FixedPoint::new(scale)),
            None => Box::new(PassThrough),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_nested_depth, 32);
        assert!(!config.strict_depth);
        assert_eq!(config.numeric_scale, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_max_nested_depth_bounds() {
        let mut config = EngineConfig::default();
        config.max_nested_depth = 0;
        assert!(config.validate().is_err());

        config.max_nested_depth = 33;
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "STRUCTPATH_CONFIG_INVALID");

        config.max_nested_depth = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_numeric_scale_bound() {
        let config = EngineConfig {
            numeric_scale: Some(29),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("structpath.json");
        fs::write(&path, json!({"max_nested_depth": 4, "numeric_scale": 2}).to_string()).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.max_nested_depth, 4);
        assert_eq!(config.numeric_scale, Some(2));
        assert!(!config.strict_depth);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("structpath.json");
        fs::write(&path, r#"{"max_nested_depth": 64}"#).unwrap();

        let err = EngineConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = EngineConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code(), "STRUCTPATH_CONFIG_READ_FAILED");
    }

    #[test]
    fn test_coercion_selection() {
        let config = EngineConfig {
            numeric_scale: Some(1),
            ..EngineConfig::default()
        };
        let coercion = config.coercion();
        let number = serde_json::Number::from_f64(1.26).unwrap();
        assert_eq!(coercion.coerce(&number), json!(1.3));
    }
}

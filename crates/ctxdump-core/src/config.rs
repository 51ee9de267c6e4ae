//! Configuration schema (ctxdump.toml)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Include-path derivation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeConfig {
    /// Types whose name starts with this prefix (case-insensitive) are traversed
    pub namespace: String,

    /// Most `.` separators a produced path may contain
    pub max_depth: usize,

    /// Mark each expanded container type so it is not expanded again
    pub add_to_ignore_list: bool,
}

impl Default for IncludeConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            max_depth: 3,
            add_to_ignore_list: true,
        }
    }
}

/// Bulk export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory artifacts are written to
    pub output_dir: PathBuf,

    /// Deepest record nesting level that is expanded
    pub max_depth: usize,

    /// Emit `$id`/`$ref` markers for shared records
    pub preserve_references: bool,

    /// Indent the written JSON
    pub pretty: bool,

    /// Print the metadata layout and recoverable failures to the console
    pub show_in_console: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dump"),
            max_depth: 1,
            preserve_references: true,
            pretty: true,
            show_in_console: false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Include-path settings
    #[serde(default)]
    pub include: IncludeConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Output directory, relative paths resolved against the project root
    pub fn output_dir(&self) -> PathBuf {
        if self.export.output_dir.is_absolute() {
            self.export.output_dir.clone()
        } else {
            self.project_root.join(&self.export.output_dir)
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

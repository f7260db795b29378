//! Configuration management for the CLI
//!
//! Settings are loaded from a TOML file (by default
//! `~/.config/yamlate/config.toml`), with every field optional and
//! defaulted, then overridden per-run by command-line arguments.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Translation API settings
    pub api: ApiConfig,

    /// File handling settings
    pub files: FileConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Run history settings
    pub history: HistoryConfig,
}

/// Translation API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Model ID sent to the provider
    pub model: String,

    /// Number of texts per API request
    pub batch_size: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum attempts per batch
    pub max_retries: u32,

    /// Base URL override for the provider
    pub base_url: Option<String>,

    /// API key (the YAMLATE_API_KEY environment variable takes precedence)
    pub api_key: Option<String>,
}

/// File handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Copy the input file aside before a translation run
    pub auto_backup: bool,

    /// Filename prefix for translation output files
    pub output_prefix: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Show progress indicators
    pub progress: bool,

    /// Use colored output by default
    pub color: bool,
}

/// Run history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Record translation runs automatically
    pub auto_save: bool,

    /// Maximum entries kept in the history file
    pub max_entries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            batch_size: 50,
            timeout_secs: 30,
            max_retries: 3,
            base_url: None,
            api_key: None,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            auto_backup: true,
            output_prefix: "translated_".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            progress: true,
            color: true,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            auto_save: true,
            max_entries: 100,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("invalid config file {}: {}", path.display(), e)))
    }

    /// Load configuration from the default location, falling back to
    /// defaults when no file exists
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or the default location
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            if !path.exists() {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Default configuration file path (`~/.config/yamlate/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("yamlate").join("config.toml"))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

//! Configuration management
//!
//! This module handles loading, validation, and management of the Quill
//! configuration. Configuration is stored in TOML format at
//! ~/.quill/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Default project root, log level
//! - **gemini**: Gemini API base URL and model name
//!
//! # Path Expansion
//!
//! The configuration system automatically:
//! - Expands ~ to the user's home directory
//! - Canonicalizes the project root to resolve symlinks and .. patterns
//! - Creates the project root directory if it doesn't exist
//!
//! The Gemini API key is never stored here; it lives in the OS keychain
//! (see the `secrets` module).

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// This structure represents the complete Quill configuration loaded from
/// ~/.quill/config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    pub core: CoreConfig,

    /// Gemini provider configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Default project root directory (supports ~ expansion)
    pub project_root: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for Gemini API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,
    // Note: API key stored in OS keychain, not in config
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.quill/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default
    /// configuration. Validates the configuration after loading and returns
    /// descriptive errors if validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails (invalid log level, bad project root)
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default_config();
        config.validate_and_process()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.quill/config.toml)
    fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".quill").join("config.toml"))
    }

    /// Create a default configuration
    fn default_config() -> Self {
        Self {
            core: CoreConfig {
                project_root: PathBuf::from("~/projects"),
                log_level: default_log_level(),
            },
            gemini: GeminiConfig::default(),
        }
    }

    /// Validate and process configuration
    ///
    /// This method:
    /// - Validates the log level
    /// - Expands ~ in the project root
    /// - Canonicalizes the project root, creating it if it doesn't exist
    /// - Verifies the project root is a directory
    fn validate_and_process(&mut self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if self.gemini.base_url.is_empty() || self.gemini.model.is_empty() {
            return Err(EngineError::Config(
                "gemini.base_url and gemini.model must not be empty".to_string(),
            ));
        }

        self.core.project_root = expand_path(&self.core.project_root)?;
        self.core.project_root = canonicalize_or_create(&self.core.project_root)?;

        if !self.core.project_root.is_dir() {
            return Err(EngineError::Config(format!(
                "Project root is not a directory: {:?}",
                self.core.project_root
            )));
        }

        Ok(())
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}

/// Canonicalize path, creating it if it doesn't exist
fn canonicalize_or_create(path: &Path) -> Result<PathBuf, EngineError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            EngineError::Config(format!("Failed to create directory {:?}: {}", path, e))
        })?;
    }

    path.canonicalize().map_err(|e| {
        EngineError::Config(format!("Failed to canonicalize path {:?}: {}", path, e))
    })
}

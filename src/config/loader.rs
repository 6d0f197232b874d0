//! Configuration file loader.

use std::path::{Path, PathBuf};

use super::FileConfig;

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .mysql-audit.toml
        search_paths.push(PathBuf::from(".mysql-audit.toml"));

        // 2. User config directory: ~/.config/mysql-audit/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("mysql-audit").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or
    /// holds an invalid value.
    pub fn load(&self) -> Result<FileConfig, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                let config = Self::load_from_path(path)?;
                validate_identifier("audit.password_column", &config.audit.password_column)?;
                return Ok(config);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(FileConfig::default())
    }

    fn load_from_path(path: &Path) -> Result<FileConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject anything that is not a bare SQL identifier.
///
/// The password column is spliced into a query, so it must not carry quotes
/// or whitespace.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if `value` is not an identifier.
pub fn validate_identifier(key: &str, value: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a column name".to_string(),
        })
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read password: {0}")]
    PasswordPrompt(#[source] std::io::Error),
}

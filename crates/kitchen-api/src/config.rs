//! Process configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! base_url = "https://chef.example.com"
//!
//! [sandbox]
//! max_id_attempts = 5
//! upload_path_prefix = "/file_store"
//! ```

use kitchen_sandbox::SandboxConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Values out of bounds
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Prefix for URLs handed to clients
    pub base_url: Option<String>,
    pub sandbox: SandboxConfig,
}

impl KitchenConfig {
    /// Parse from a TOML string
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` or `ConfigError::Invalid`
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::parse(source, Path::new("<inline>"))
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns `ConfigError` on read, parse or validation failure
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, path)
    }

    fn parse(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .sandbox
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }
}

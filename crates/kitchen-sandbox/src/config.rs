//! Sandbox coordinator configuration

use crate::error::SandboxError;
use serde::{Deserialize, Serialize};

/// Minimum seed size drawn per id attempt
pub const MIN_ENTROPY_BYTES: usize = 20;

/// Maximum seed size drawn per id attempt
pub const MAX_ENTROPY_BYTES: usize = 1024;

/// Coordinator configuration
///
/// Every field has a default, so a partial TOML table deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Id attempts before giving up on collisions
    pub max_id_attempts: u32,
    /// Random bytes hashed into each candidate id
    pub entropy_bytes: usize,
    /// Prefix of the upload target reported for missing checksums
    pub upload_path_prefix: String,
}

impl SandboxConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id attempt ceiling
    #[inline]
    #[must_use]
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        self.max_id_attempts = attempts;
        self
    }

    /// Set the seed size, in bytes
    #[inline]
    #[must_use]
    pub fn with_entropy_bytes(mut self, bytes: usize) -> Self {
        self.entropy_bytes = bytes;
        self
    }

    /// Set the upload target prefix, e.g. `/file_store`
    #[inline]
    #[must_use]
    pub fn with_upload_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.upload_path_prefix = prefix.into();
        self
    }

    /// Upload target for a checksum
    #[must_use]
    pub fn upload_target(&self, checksum: &str) -> String {
        format!("{}/{checksum}", self.upload_path_prefix.trim_end_matches('/'))
    }

    /// Check configuration bounds
    ///
    /// # Errors
    /// Returns `SandboxError::Config` for zero attempts or a seed outside
    /// [`MIN_ENTROPY_BYTES`]..=[`MAX_ENTROPY_BYTES`]
    pub fn validate(&self) -> Result<(), SandboxError> {
        if self.max_id_attempts == 0 {
            return Err(SandboxError::Config(
                "max_id_attempts must be at least 1".to_string(),
            ));
        }
        if self.entropy_bytes < MIN_ENTROPY_BYTES {
            return Err(SandboxError::Config(format!(
                "entropy_bytes must be at least {MIN_ENTROPY_BYTES}, got {}",
                self.entropy_bytes
            )));
        }
        if self.entropy_bytes > MAX_ENTROPY_BYTES {
            return Err(SandboxError::Config(format!(
                "entropy_bytes must be at most {MAX_ENTROPY_BYTES}, got {}",
                self.entropy_bytes
            )));
        }
        Ok(())
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_id_attempts: 5,
            entropy_bytes: MIN_ENTROPY_BYTES,
            upload_path_prefix: "/file_store".to_string(),
        }
    }
}

//! Error types for sandbox coordination

use crate::entropy::EntropyError;
use crate::id::SandboxId;
use kitchen_store::{Checksum, StoreError};

/// Main sandbox error type
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// No sandbox stored under this id
    #[error("sandbox {id} not found")]
    NotFound { id: String },

    /// Every id candidate collided with an existing sandbox
    #[error("could not generate a unique sandbox id after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },

    /// Random source failed
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// A declared checksum has not been uploaded
    #[error("checksum {checksum} not uploaded yet, sandbox {sandbox_id} cannot be committed")]
    Incomplete {
        sandbox_id: SandboxId,
        checksum: Checksum,
    },

    /// Several declared checksums have not been uploaded
    #[error(
        "{} checksums not uploaded yet, sandbox {sandbox_id} cannot be committed",
        .checksums.len()
    )]
    IncompleteMany {
        sandbox_id: SandboxId,
        checksums: Vec<Checksum>,
    },

    /// Stored value could not be decoded as a sandbox
    #[error("stored sandbox {id} is corrupt: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backend failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration out of bounds
    #[error("configuration error: {0}")]
    Config(String),
}

impl SandboxError {
    /// Whether this is a server-side fault rather than a problem with the
    /// request
    #[inline]
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::ExhaustedRetries { .. }
                | Self::Entropy(_)
                | Self::Corrupt { .. }
                | Self::Store(_)
                | Self::Config(_)
        )
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

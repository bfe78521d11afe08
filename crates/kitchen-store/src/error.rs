//! Error types for store backends

/// Errors surfaced by key-value and content store backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend-specific failure
    #[error("{backend} backend failure: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    /// Value could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Checksum string is not usable as a content key
    #[error("invalid checksum: '{0}'")]
    InvalidChecksum(String),

    /// IO error from a filesystem backend
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Create backend failure
    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend,
            message: message.into(),
        }
    }
}

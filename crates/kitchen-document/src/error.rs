//! Error types for document ingestion
//!
//! Every coercion from a dynamic JSON value to a concrete shape fails with a
//! [`SchemaError`] instead of panicking.

/// A known field had the wrong shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field '{field}' is malformed: {reason}")]
pub struct SchemaError {
    field: &'static str,
    reason: String,
}

impl SchemaError {
    /// Create schema error for field
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field
    #[inline]
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Errors while turning a request body into a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Body is not valid JSON
    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Body is valid JSON but not an object
    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    /// A known field had the wrong shape
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DocumentError {
    /// Whether the body failed to decode (as opposed to a shape violation)
    #[inline]
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::NotAnObject { .. })
    }
}

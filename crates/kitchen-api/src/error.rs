//! Boundary error classification

use crate::envelope::{status, ApiResponse, ErrorEnvelope};
use kitchen_document::DocumentError;
use kitchen_sandbox::SandboxError;

/// Any failure surfaced to a client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource body failed decoding or normalization
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Sandbox operation failed
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    /// Request body is malformed for its endpoint
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Status code for this error kind
    ///
    /// Client errors for malformed or incomplete input, 404 for missing
    /// resources, 500 for store, entropy and id-exhaustion faults.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Document(_) | Self::BadRequest(_) => status::BAD_REQUEST,
            Self::Sandbox(e) if e.is_not_found() => status::NOT_FOUND,
            Self::Sandbox(e) if e.is_internal() => status::INTERNAL_SERVER_ERROR,
            Self::Sandbox(_) => status::BAD_REQUEST,
        }
    }

    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.to_string())
    }

    /// Log once and turn into a response
    #[must_use]
    pub fn into_response(self) -> ApiResponse {
        let code = self.status();
        if code >= status::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed ({}): {}", code, self);
        } else {
            tracing::warn!("Request rejected ({}): {}", code, self);
        }
        let body = serde_json::json!({ "error": self.envelope().error });
        ApiResponse::new(code, body)
    }
}

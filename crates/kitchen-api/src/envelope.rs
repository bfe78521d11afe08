//! Response envelopes
//!
//! Every failure leaves the boundary as `{"error": [<message>]}` with a
//! status code chosen by error kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status codes used at the boundary
pub mod status {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Generic error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Vec<String>,
}

impl ErrorEnvelope {
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: vec![message.into()],
        }
    }
}

/// A status code plus JSON body, ready for any HTTP layer to write out
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    #[inline]
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

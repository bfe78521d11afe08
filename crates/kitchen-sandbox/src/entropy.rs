//! Randomness for id generation

use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt::Debug;

/// The random source could not supply the requested bytes
#[derive(Debug, thiserror::Error)]
#[error("entropy source failed to supply {requested} bytes: {reason}")]
pub struct EntropyError {
    requested: usize,
    reason: String,
}

impl EntropyError {
    pub fn new(requested: usize, reason: impl Into<String>) -> Self {
        Self {
            requested,
            reason: reason.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }
}

/// Source of seed bytes for sandbox ids
///
/// Must be cryptographically secure in production. A failure is a systemic
/// fault and is never retried.
pub trait EntropySource: Send + Sync + Debug {
    /// Fill `buf` completely or fail
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

/// Operating-system randomness
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        let mut rng = OsRng;
        rng.try_fill_bytes(buf)
            .map_err(|e| EntropyError::new(buf.len(), e.to_string()))
    }
}

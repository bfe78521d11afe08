//! Sandbox identifiers
//!
//! Provides [`SandboxId`], a 16-byte digest rendered as 32 lowercase hex
//! characters.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A sandbox identifier
///
/// Derived by hashing fresh entropy, so ids carry no information about the
/// sandbox they name. Immutable and cheap to clone (Copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SandboxId([u8; 16]);

impl SandboxId {
    /// Raw length in bytes
    pub const LEN: usize = 16;

    /// Length of the hex rendering
    pub const HEX_LEN: usize = 32;

    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Create id from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 16 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SandboxIdError> {
        let arr: [u8; 16] = bytes
            .try_into()
            .map_err(|_| SandboxIdError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Derive an id from random seed bytes
    ///
    /// BLAKE3 of the seed, truncated to 16 bytes.
    #[must_use]
    pub fn from_entropy(seed: &[u8]) -> Self {
        let digest = blake3::hash(seed);
        let mut arr = [0u8; 16];
        arr.copy_from_slice(&digest.as_bytes()[..Self::LEN]);
        Self(arr)
    }
}

impl Display for SandboxId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for SandboxId {
    type Err = SandboxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::HEX_LEN {
            return Err(SandboxIdError::InvalidLength {
                expected: Self::HEX_LEN,
                actual: s.len(),
            });
        }
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl serde::Serialize for SandboxId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for SandboxId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SandboxIdVisitor;

        impl serde::de::Visitor<'_> for SandboxIdVisitor {
            type Value = SandboxId;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 32-character hex sandbox id")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(SandboxIdVisitor)
    }
}

/// Errors that can occur when parsing sandbox ids
#[derive(Debug, thiserror::Error)]
pub enum SandboxIdError {
    /// Wrong length (bytes or hex chars, depending on input)
    #[error("invalid sandbox id length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex decoding error
    #[error("hex decode error: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_id_display_is_lowercase_hex() {
        let id = SandboxId::new([0xAB; 16]);
        let s = id.to_string();
        assert_eq!(s.len(), 32);
        assert_eq!(s, "ab".repeat(16));
    }

    #[test]
    fn sandbox_id_parse_round_trip() {
        let id = SandboxId::from_entropy(b"twenty bytes of seed");
        let parsed: SandboxId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn sandbox_id_parse_accepts_uppercase() {
        let parsed: SandboxId = "AB".repeat(16).parse().unwrap();
        assert_eq!(parsed.to_string(), "ab".repeat(16));
    }

    #[test]
    fn sandbox_id_parse_wrong_length() {
        let result = "abc".parse::<SandboxId>();
        assert!(matches!(
            result,
            Err(SandboxIdError::InvalidLength { expected: 32, actual: 3 })
        ));
    }

    #[test]
    fn sandbox_id_parse_non_hex() {
        let result = "zz".repeat(16).parse::<SandboxId>();
        assert!(matches!(result, Err(SandboxIdError::InvalidHex(_))));
    }

    #[test]
    fn sandbox_id_from_slice_invalid_length() {
        let result = SandboxId::from_slice(&[1u8; 15]);
        assert!(matches!(
            result,
            Err(SandboxIdError::InvalidLength { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn sandbox_id_from_entropy_deterministic() {
        let seed = [7u8; 20];
        assert_eq!(SandboxId::from_entropy(&seed), SandboxId::from_entropy(&seed));
        assert_ne!(
            SandboxId::from_entropy(&seed),
            SandboxId::from_entropy(&[8u8; 20])
        );
    }

    #[test]
    fn sandbox_id_serde_as_hex_string() {
        let id = SandboxId::new([1u8; 16]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(16)));

        let decoded: SandboxId = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, id);
    }
}

//! Content fingerprints for generated geometry

use sha2::{Digest, Sha256};
use std::fmt;

/// A SHA-256 digest over one or more byte buffers.
///
/// Generation is deterministic, so two runs with the same config and
/// heightmap must produce the same fingerprint for their vertex and index
/// buffers.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a single buffer
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_parts(&[data])
    }

    /// Hash several buffers in order, as if they were concatenated
    pub fn from_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// First 8 hex characters, for log lines
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

//! Stable per-player identifiers
//!
//! An identifier is the lowercase hex SHA-256 of the connecting player's
//! seed bytes: their public key when the transport has one, otherwise a
//! fallback such as the player's sign-in name.

use std::fmt;

use sha2::{Digest, Sha256};

/// Raw material an identifier is derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySeed {
    /// Wire encoding of a public key
    PublicKey(Vec<u8>),
    /// Connection address or username
    Fallback(String),
}

impl IdentitySeed {
    #[must_use]
    pub fn fallback(text: impl Into<String>) -> Self {
        Self::Fallback(text.into())
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::PublicKey(key) => key,
            Self::Fallback(text) => text.as_bytes(),
        }
    }

    /// Derive the player's identifier
    #[must_use]
    pub fn identifier(&self) -> Identifier {
        Identifier::derive(self.bytes())
    }
}

/// Deterministic fingerprint used as the results partition key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Hash `seed` into an identifier
    #[must_use]
    pub fn derive(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);
        Self(format!("{digest:x}"))
    }

    /// Wrap an already-derived hex identifier, e.g. from the command line
    ///
    /// Returns `None` unless `hex` is 64 hex digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().to_ascii_lowercase();
        (hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit())).then_some(Self(hex))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First few hex digits, for log lines
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

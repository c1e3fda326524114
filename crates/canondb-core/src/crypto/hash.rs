//! SHA-256 hashing and hex rendering.

use sha2::{Digest as _, Sha256};
use thiserror::Error;

/// Size of a SHA-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Type alias for a 32-byte digest.
pub type Digest = [u8; DIGEST_SIZE];

/// Errors produced when decoding hex-rendered digests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DigestError {
    /// The hex string does not describe exactly [`DIGEST_SIZE`] bytes.
    #[error("invalid digest length: expected {expected} hex chars, got {actual}")]
    InvalidLength {
        /// The expected number of hex characters.
        expected: usize,
        /// The actual number of characters.
        actual: usize,
    },

    /// The string contains a character outside `[0-9a-fA-F]`.
    #[error("invalid hex character at offset {offset}")]
    InvalidCharacter {
        /// Byte offset of the offending character.
        offset: usize,
    },
}

/// Hasher for canon artifacts and registry identifiers.
pub struct ContentHasher;

impl ContentHasher {
    /// Hashes raw content with SHA-256.
    #[must_use]
    pub fn hash_content(content: &[u8]) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(content);
        hasher.finalize().into()
    }
}

/// Hashes bytes and renders the digest as lowercase hex.
///
/// This is the form every canon identifier is stored in.
#[must_use]
pub fn sha256_hex(content: &[u8]) -> String {
    hex_encode(&ContentHasher::hash_content(content))
}

/// Encodes a digest as a lowercase hex string.
#[must_use]
pub fn hex_encode(digest: &Digest) -> String {
    use std::fmt::Write;
    digest.iter().fold(
        String::with_capacity(DIGEST_SIZE * 2),
        |mut acc: String, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        },
    )
}

/// Decodes a lowercase or uppercase hex string into a digest.
///
/// # Errors
///
/// Returns [`DigestError`] if the string is not exactly 64 hex characters.
pub fn hex_decode(s: &str) -> Result<Digest, DigestError> {
    if s.len() != DIGEST_SIZE * 2 {
        return Err(DigestError::InvalidLength {
            expected: DIGEST_SIZE * 2,
            actual: s.len(),
        });
    }

    let mut digest = [0u8; DIGEST_SIZE];
    for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
        let high = hex_nibble(chunk[0]).ok_or(DigestError::InvalidCharacter { offset: i * 2 })?;
        let low =
            hex_nibble(chunk[1]).ok_or(DigestError::InvalidCharacter { offset: i * 2 + 1 })?;
        digest[i] = (high << 4) | low;
    }
    Ok(digest)
}

const fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

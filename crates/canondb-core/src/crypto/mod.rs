//! Content hashing primitives.
//!
//! Every identifier in the registry (artifact hashes, decision ids,
//! equivalence keys) is a SHA-256 digest of canonical bytes, rendered as
//! lowercase hex.

mod hash;

pub use hash::{ContentHasher, Digest, DigestError, DIGEST_SIZE, hex_decode, hex_encode, sha256_hex};

//! Deterministic byte serialization of canon artifacts.
//!
//! Reproducible hashing requires that logically equal artifacts always
//! canonicalize to identical bytes. Two encodings are supported:
//!
//! - **Structured** ([`canonical_json_bytes`]): compact JSON with object
//!   keys sorted lexicographically at every nesting level.
//! - **Text** ([`canonical_text_bytes`]): line terminators normalized to
//!   LF, trailing whitespace stripped per line.

mod canonical_json;
mod canonical_text;

pub use canonical_json::{canonical_json_bytes, canonical_json_from_str, MAX_DEPTH};
pub use canonical_text::{canonical_text_bytes, canonical_text_from_bytes};

use thiserror::Error;

/// Errors produced when input cannot be canonicalized deterministically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CanonicalError {
    /// The input is not valid JSON.
    #[error("JSON parse error: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// An object contains the same key more than once.
    ///
    /// JSON parsers usually resolve duplicates last-wins, which would make
    /// the canonical form depend on parser behavior, so duplicates are
    /// rejected outright.
    #[error("duplicate key: '{key}' appears multiple times in object")]
    DuplicateKey {
        /// The duplicated key.
        key: String,
    },

    /// The structure nests deeper than [`MAX_DEPTH`] levels.
    #[error("max depth exceeded: structure nested deeper than {max_depth} levels")]
    MaxDepthExceeded {
        /// The depth limit that was exceeded.
        max_depth: usize,
    },

    /// The input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {message}")]
    InvalidUtf8 {
        /// Description of the decoding failure.
        message: String,
    },
}

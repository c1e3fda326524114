//! Decision artifact shapes and field extraction.
//!
//! External workers hand the core raw artifacts in one of two encodings:
//!
//! - **Headered text**: a document that begins with an HTML-comment
//!   metadata block of `KEY: value` pairs.
//! - **Structured record**: a self-describing JSON object.
//!
//! Dispatch between the two is by structural recognition of the required
//! keys, never by file naming convention. Scope and identity fields are
//! normalized to fixed tuples; a missing scope key or a sentinel identity
//! value is a hard parse failure, never defaulted away.

mod parser;

pub use parser::{parse, parse_with_defaults, ArtifactDefaults, HEADER_IDENTITY_KEY, HEADER_KIND_KEY, HEADER_LIFECYCLE_KEY, HEADER_SCOPE_KEY};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Sentinel marking an identity field whose real value was never filled
/// in. Registration refuses artifacts carrying it.
pub const UNSET_SENTINEL: &str = "UNSET";

/// Errors produced while extracting decision fields from a raw artifact.
///
/// A parse failure aborts registration of that one artifact only; other
/// artifacts in the same run still process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The document matches neither recognized shape.
    #[error("unrecognized artifact shape: neither a headered text document nor a structured record")]
    UnrecognizedShape,

    /// A required metadata key is absent from the header block.
    #[error("missing header key: {key}")]
    MissingHeaderKey {
        /// The absent key.
        key: String,
    },

    /// A header value that should hold an embedded JSON record does not.
    #[error("malformed embedded JSON in header key {key}: {message}")]
    MalformedEmbeddedJson {
        /// The header key holding the embedded record.
        key: String,
        /// Description of the JSON error.
        message: String,
    },

    /// A required top-level key is absent from a structured record.
    #[error("missing record key: {key}")]
    MissingRecordKey {
        /// The absent key.
        key: String,
    },

    /// A field that must be a JSON object is something else.
    #[error("field {field} must be an object")]
    NotAnObject {
        /// The offending field.
        field: String,
    },

    /// A scope key is absent. Scope keys are never defaulted.
    #[error("missing scope key: {key}")]
    MissingScopeKey {
        /// The absent scope key.
        key: String,
    },

    /// A scope value is not a string.
    #[error("scope key {key} must be a string")]
    NonStringScopeValue {
        /// The offending scope key.
        key: String,
    },

    /// An identity field is absent or empty.
    #[error("missing identity field: {key}")]
    MissingIdentityField {
        /// The absent identity field.
        key: String,
    },

    /// An identity field carries the `UNSET` sentinel.
    #[error("identity field {key} is {UNSET_SENTINEL}")]
    UnsetIdentityField {
        /// The offending identity field.
        key: String,
    },

    /// The raw bytes are not valid UTF-8.
    #[error("artifact is not valid UTF-8: {message}")]
    InvalidUtf8 {
        /// Description of the decoding failure.
        message: String,
    },
}

/// The two recognized artifact encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactEncoding {
    /// Text document with a leading metadata block; hashed through the
    /// text canonicalizer.
    HeaderedText,
    /// Self-describing JSON record; hashed through the structured
    /// canonicalizer.
    StructuredRecord,
}

/// The tuple identifying what a decision is about, independent of content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionScope {
    /// Origin-destination pair the decision applies to.
    pub od_pair: String,
    /// Graph the decision applies to.
    pub graph_id: String,
    /// Run the decision applies to.
    pub run_id: String,
    /// Lifecycle epoch the decision belongs to.
    pub lifecycle_id: String,
}

/// The tuple identifying under what world-state a decision was made.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityFields {
    /// Repository commit the decision was made against.
    pub repo_commit: String,
    /// Hash of the objective specification.
    pub objective_hash: String,
    /// Hash of the graph definition.
    pub graph_hash: String,
    /// Hash of the parameter set.
    pub params_hash: String,
}

/// Decision-relevant fields extracted from one raw artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArtifact {
    /// The decision kind declared by the artifact.
    pub kind: String,
    /// Normalized decision scope.
    pub scope: DecisionScope,
    /// Normalized identity fields.
    pub identity_fields: IdentityFields,
    /// Lifecycle epoch the artifact declares.
    pub lifecycle_id: String,
    /// Which encoding the artifact was recognized as.
    pub encoding: ArtifactEncoding,
}

/// Normalizes a raw scope record to the fixed four-key tuple.
///
/// `od_pair`, `graph_id`, and `run_id` must be present as strings. The
/// scope's `lifecycle_id` may instead come from the artifact's own
/// declared lifecycle id (passed as `declared_lifecycle_id`); a scope
/// entry, when present, wins.
///
/// # Errors
///
/// Returns [`ParseError`] when a key is absent or not a string.
pub fn canonical_scope(
    raw: &Map<String, Value>,
    declared_lifecycle_id: &str,
) -> Result<DecisionScope, ParseError> {
    let lifecycle_id = match raw.get("lifecycle_id") {
        Some(value) => scope_string(value, "lifecycle_id")?,
        None if !declared_lifecycle_id.is_empty() => declared_lifecycle_id.to_string(),
        None => {
            return Err(ParseError::MissingScopeKey {
                key: "lifecycle_id".to_string(),
            })
        },
    };

    Ok(DecisionScope {
        od_pair: required_scope_string(raw, "od_pair")?,
        graph_id: required_scope_string(raw, "graph_id")?,
        run_id: required_scope_string(raw, "run_id")?,
        lifecycle_id,
    })
}

/// Normalizes a raw identity record to the fixed four-field tuple.
///
/// All four fields must be present, non-empty strings; a value containing
/// the [`UNSET_SENTINEL`] fails the check.
///
/// # Errors
///
/// Returns [`ParseError`] when a field is absent, empty, or sentinel.
pub fn canonical_identity(raw: &Map<String, Value>) -> Result<IdentityFields, ParseError> {
    Ok(IdentityFields {
        repo_commit: required_identity_string(raw, "repo_commit")?,
        objective_hash: required_identity_string(raw, "objective_hash")?,
        graph_hash: required_identity_string(raw, "graph_hash")?,
        params_hash: required_identity_string(raw, "params_hash")?,
    })
}

fn scope_string(value: &Value, key: &str) -> Result<String, ParseError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ParseError::NonStringScopeValue {
            key: key.to_string(),
        })
}

fn required_scope_string(raw: &Map<String, Value>, key: &str) -> Result<String, ParseError> {
    let value = raw.get(key).ok_or_else(|| ParseError::MissingScopeKey {
        key: key.to_string(),
    })?;
    scope_string(value, key)
}

fn required_identity_string(raw: &Map<String, Value>, key: &str) -> Result<String, ParseError> {
    let value = raw
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ParseError::MissingIdentityField {
            key: key.to_string(),
        })?;
    if value.contains(UNSET_SENTINEL) {
        return Err(ParseError::UnsetIdentityField {
            key: key.to_string(),
        });
    }
    Ok(value.to_string())
}

//! Decision records and their content-addressed identifiers.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::artifact::{ArtifactEncoding, DecisionScope, IdentityFields};
use crate::crypto::sha256_hex;
use crate::determinism::{
    canonical_json_bytes, canonical_json_from_str, canonical_text_bytes, CanonicalError,
};

/// Status of a decision record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    /// The record is the current decision for its tuple.
    Active,
    /// The record was replaced by a later registration.
    Superseded,
}

/// How equality of artifact content was judged for this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalencePolicy {
    /// Policy identifier.
    pub policy_name: String,
    /// Human-readable canonicalization description.
    pub canonicalization: String,
    /// Which fields the comparison covers.
    pub compare_fields: Vec<String>,
}

impl EquivalencePolicy {
    /// Policy for structured records hashed through the JSON
    /// canonicalizer.
    #[must_use]
    pub fn canonical_json() -> Self {
        Self {
            policy_name: "canonical_json_sha256".to_string(),
            canonicalization: "JSON sort keys, compact separators, UTF-8".to_string(),
            compare_fields: vec!["__full_json__".to_string()],
        }
    }

    /// Policy for headered text hashed through the text canonicalizer.
    #[must_use]
    pub fn canonical_text() -> Self {
        Self {
            policy_name: "canonical_lf_trim_trailing_ws_sha256".to_string(),
            canonicalization: "LF normalize, trim trailing whitespace per line, UTF-8".to_string(),
            compare_fields: vec!["__full_text__".to_string()],
        }
    }

    /// Policy matching an artifact encoding.
    #[must_use]
    pub fn for_encoding(encoding: ArtifactEncoding) -> Self {
        match encoding {
            ArtifactEncoding::HeaderedText => Self::canonical_text(),
            ArtifactEncoding::StructuredRecord => Self::canonical_json(),
        }
    }
}

/// Where a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Root-relative path of the source artifact.
    pub source_artifact: String,
    /// Source encoding (`"text"` or `"json"`).
    pub source_type: String,
    /// Tool that produced the record.
    pub generator: String,
}

/// One registry entry: a registered artifact version at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Content-addressed identifier of this record.
    pub decision_id: String,
    /// The decision kind.
    pub kind: String,
    /// What the decision is about.
    pub scope: DecisionScope,
    /// Under what world-state the decision was made.
    pub identity_fields: IdentityFields,
    /// Root-relative path of the registered artifact.
    pub artifact_path: String,
    /// Hash of the artifact's canonical bytes.
    pub artifact_hash: String,
    /// How content equality was judged.
    pub equivalence_policy: EquivalencePolicy,
    /// Where the record came from.
    pub provenance: Provenance,
    /// Current status.
    pub status: DecisionStatus,
    /// Decision ids of the records this one superseded. Each referenced
    /// record was active immediately before the transition.
    #[serde(default)]
    pub supersedes: Vec<String>,
}

impl DecisionRecord {
    /// The derived key for this record's `(kind, scope, identity)` tuple.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalError`] if the tuple cannot be canonicalized.
    pub fn equivalence_key(&self) -> Result<String, CanonicalError> {
        equivalence_key_for(&self.kind, &self.scope, &self.identity_fields)
    }
}

/// One status transition, kept so history is auditable without ever
/// editing a record's past in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The record that transitioned.
    pub decision_id: String,
    /// Status before the transition.
    pub from: DecisionStatus,
    /// Status after the transition.
    pub to: DecisionStatus,
    /// The record that caused the transition.
    pub superseded_by: String,
}

/// Derives the content-addressed decision identifier.
///
/// The id is a pure function of `(kind, scope, identity_fields,
/// artifact_hash)`; identical inputs always produce identical ids,
/// regardless of in-memory key ordering.
///
/// # Errors
///
/// Returns [`CanonicalError`] if the tuple cannot be canonicalized.
pub fn decision_id_for(
    kind: &str,
    scope: &DecisionScope,
    identity_fields: &IdentityFields,
    artifact_hash: &str,
) -> Result<String, CanonicalError> {
    let key = json!({
        "kind": kind,
        "scope": scope,
        "identity_fields": identity_fields,
        "artifact_hash": artifact_hash,
    });
    Ok(sha256_hex(&canonical_json_bytes(&key)?))
}

/// Derives the equivalence key for a `(kind, scope, identity)` tuple.
///
/// # Errors
///
/// Returns [`CanonicalError`] if the tuple cannot be canonicalized.
pub fn equivalence_key_for(
    kind: &str,
    scope: &DecisionScope,
    identity_fields: &IdentityFields,
) -> Result<String, CanonicalError> {
    let key = json!({
        "kind": kind,
        "scope": scope,
        "identity_fields": identity_fields,
    });
    Ok(sha256_hex(&canonical_json_bytes(&key)?))
}

/// Hashes raw artifact content through the canonicalizer matching its
/// encoding.
///
/// # Errors
///
/// Returns [`CanonicalError`] when structured content cannot be
/// canonicalized.
pub fn artifact_hash_for(encoding: ArtifactEncoding, raw: &str) -> Result<String, CanonicalError> {
    let canonical = match encoding {
        ArtifactEncoding::HeaderedText => canonical_text_bytes(raw),
        ArtifactEncoding::StructuredRecord => canonical_json_from_str(raw)?,
    };
    Ok(sha256_hex(&canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> DecisionScope {
        DecisionScope {
            od_pair: "od-1".to_string(),
            graph_id: "g-1".to_string(),
            run_id: "r-1".to_string(),
            lifecycle_id: "LC-1".to_string(),
        }
    }

    fn identity() -> IdentityFields {
        IdentityFields {
            repo_commit: "abc".to_string(),
            objective_hash: "o".to_string(),
            graph_hash: "g".to_string(),
            params_hash: "p".to_string(),
        }
    }

    #[test]
    fn decision_id_is_deterministic() {
        let a = decision_id_for("spec", &scope(), &identity(), "hash1").unwrap();
        let b = decision_id_for("spec", &scope(), &identity(), "hash1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn decision_id_depends_on_content_hash() {
        let a = decision_id_for("spec", &scope(), &identity(), "hash1").unwrap();
        let b = decision_id_for("spec", &scope(), &identity(), "hash2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn equivalence_key_ignores_content_hash() {
        let key = equivalence_key_for("spec", &scope(), &identity()).unwrap();
        let same = equivalence_key_for("spec", &scope(), &identity()).unwrap();
        assert_eq!(key, same);
        assert_ne!(
            key,
            decision_id_for("spec", &scope(), &identity(), "hash1").unwrap()
        );
    }

    #[test]
    fn text_hash_is_stable_across_line_endings() {
        let a = artifact_hash_for(ArtifactEncoding::HeaderedText, "line one\r\nline two  \r\n")
            .unwrap();
        let b = artifact_hash_for(ArtifactEncoding::HeaderedText, "line one\nline two\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn structured_hash_is_stable_across_key_order() {
        let a =
            artifact_hash_for(ArtifactEncoding::StructuredRecord, r#"{"b": 2, "a": 1}"#).unwrap();
        let b =
            artifact_hash_for(ArtifactEncoding::StructuredRecord, r#"{"a": 1, "b": 2}"#).unwrap();
        assert_eq!(a, b);
    }
}

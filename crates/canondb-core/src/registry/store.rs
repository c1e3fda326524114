//! Append-only decision store with supersession.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::{
    artifact_hash_for, decision_id_for, equivalence_key_for, AuditEvent, DecisionRecord,
    DecisionStatus, EquivalencePolicy, Provenance,
};
use crate::artifact::{ArtifactEncoding, DecisionScope, IdentityFields, ParsedArtifact};
use crate::determinism::CanonicalError;

/// Schema version written to the registry file.
pub const SCHEMA_VERSION: &str = "1.0";

/// Errors produced by registry operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// More than one active record exists for a single tuple. Ambiguous
    /// active state is refused, never arbitrated; resolving it requires
    /// manual intervention.
    #[error(
        "integrity violation: {active_count} active records for equivalence key {equivalence_key}"
    )]
    DuplicateActive {
        /// The equivalence key with multiple active records.
        equivalence_key: String,
        /// How many active records were found.
        active_count: usize,
    },

    /// More than one snapshot claims to be current. Registration refuses
    /// to run against an ambiguous tree.
    #[error("integrity violation: conflicting current-state pointers: {candidates:?}")]
    ConflictingCurrentPointer {
        /// The conflicting snapshot names.
        candidates: Vec<String>,
    },

    /// The registry file could not be read or written.
    #[error("registry I/O error at {path}: {source}")]
    Io {
        /// The offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The registry file does not decode as a registry.
    #[error("registry file is malformed at {path}: {source}")]
    Malformed {
        /// The offending path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Artifact content could not be canonicalized.
    #[error(transparent)]
    Canonical(#[from] CanonicalError),

    /// A scan configuration glob does not compile.
    #[error("invalid exclude glob '{pattern}': {message}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// Description of the error.
        message: String,
    },
}

/// Persisted form of the registry: one structured record holding the full
/// entry log.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryFile {
    schema_version: String,
    entries: Vec<DecisionRecord>,
    #[serde(default)]
    audit_log: Vec<AuditEvent>,
}

/// Outcome of one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutcome {
    /// The decision id now active for the artifact's tuple.
    pub decision_id: String,
    /// Whether a new record was inserted (`false` means idempotent
    /// re-registration of unchanged content).
    pub created: bool,
}

/// The decision registry: an append-only record log plus a derived
/// active view.
///
/// Records are immutable once written; the only permitted mutation is a
/// status transition to superseded, which is always accompanied by an
/// audit event. The active view is derived from the log on demand rather
/// than stored, so history doubles as the audit trail.
#[derive(Debug, Clone, Default)]
pub struct DecisionRegistry {
    entries: Vec<DecisionRecord>,
    audit_log: Vec<AuditEvent>,
}

impl DecisionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the registry from its persisted file. A missing file yields
    /// an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the file exists but cannot be read
    /// or decoded.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.is_file() {
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RegistryFile =
            serde_json::from_str(&text).map_err(|source| RegistryError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            entries: file.entries,
            audit_log: file.audit_log,
        })
    }

    /// Persists the registry, entries sorted by (kind, scope, identity,
    /// decision id) so the file itself is deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on I/O or canonicalization failure.
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let mut entries = self.entries.clone();
        let mut keyed: Vec<(String, DecisionRecord)> = Vec::with_capacity(entries.len());
        for entry in entries.drain(..) {
            let key = format!(
                "{}\u{0}{}\u{0}{}",
                entry.kind,
                entry.equivalence_key()?,
                entry.decision_id
            );
            keyed.push((key, entry));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let file = RegistryFile {
            schema_version: SCHEMA_VERSION.to_string(),
            entries: keyed.into_iter().map(|(_, e)| e).collect(),
            audit_log: self.audit_log.clone(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| RegistryError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut rendered = serde_json::to_string_pretty(&file).map_err(|source| {
            RegistryError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        rendered.push('\n');
        std::fs::write(path, rendered).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Registers one parsed artifact.
    ///
    /// Semantics per tuple `(kind, scope, identity_fields)`:
    ///
    /// - no active record: insert, `created = true`;
    /// - one active record with the same content hash: no-op,
    ///   `created = false`;
    /// - one active record with a different hash: supersede it and insert
    ///   the new record, `created = true`;
    /// - more than one active record: refuse with
    ///   [`RegistryError::DuplicateActive`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on integrity violation or when the raw
    /// content cannot be canonicalized.
    pub fn register(
        &mut self,
        artifact_path: &str,
        parsed: &ParsedArtifact,
        raw: &str,
    ) -> Result<RegisterOutcome, RegistryError> {
        let artifact_hash = artifact_hash_for(parsed.encoding, raw)?;
        let decision_id = decision_id_for(
            &parsed.kind,
            &parsed.scope,
            &parsed.identity_fields,
            &artifact_hash,
        )?;

        let active = self.active_indices(&parsed.kind, &parsed.scope, &parsed.identity_fields)?;
        match active.as_slice() {
            [] => {},
            [index] => {
                let existing = &self.entries[*index];
                if existing.artifact_hash == artifact_hash {
                    return Ok(RegisterOutcome {
                        decision_id: existing.decision_id.clone(),
                        created: false,
                    });
                }
                let superseded_id = existing.decision_id.clone();
                self.entries[*index].status = DecisionStatus::Superseded;
                self.audit_log.push(AuditEvent {
                    decision_id: superseded_id.clone(),
                    from: DecisionStatus::Active,
                    to: DecisionStatus::Superseded,
                    superseded_by: decision_id.clone(),
                });
                tracing::debug!(
                    superseded = %superseded_id,
                    superseded_by = %decision_id,
                    kind = %parsed.kind,
                    "decision superseded"
                );
                self.entries.push(Self::new_record(
                    artifact_path,
                    parsed,
                    &artifact_hash,
                    &decision_id,
                    vec![superseded_id],
                ));
                return Ok(RegisterOutcome {
                    decision_id,
                    created: true,
                });
            },
            multiple => {
                return Err(RegistryError::DuplicateActive {
                    equivalence_key: equivalence_key_for(
                        &parsed.kind,
                        &parsed.scope,
                        &parsed.identity_fields,
                    )?,
                    active_count: multiple.len(),
                });
            },
        }

        self.entries.push(Self::new_record(
            artifact_path,
            parsed,
            &artifact_hash,
            &decision_id,
            Vec::new(),
        ));
        Ok(RegisterOutcome {
            decision_id,
            created: true,
        })
    }

    /// The zero-or-one active record for a tuple.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateActive`] when more than one
    /// active record exists for the tuple.
    pub fn active(
        &self,
        kind: &str,
        scope: &DecisionScope,
        identity_fields: &IdentityFields,
    ) -> Result<Option<&DecisionRecord>, RegistryError> {
        let indices = self.active_indices(kind, scope, identity_fields)?;
        Ok(indices.first().map(|i| &self.entries[*i]))
    }

    /// Looks up a record by its decision id.
    #[must_use]
    pub fn by_id(&self, decision_id: &str) -> Option<&DecisionRecord> {
        self.entries.iter().find(|e| e.decision_id == decision_id)
    }

    /// All active records, after verifying no tuple has more than one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateActive`] on ambiguous active
    /// state.
    pub fn all_active(&self) -> Result<Vec<&DecisionRecord>, RegistryError> {
        self.verify_integrity()?;
        Ok(self.iter_active().collect())
    }

    /// Iterates active records without an integrity check. The guard uses
    /// this after orchestration has verified integrity, because gate
    /// evaluation itself must never fail.
    pub fn iter_active(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.entries
            .iter()
            .filter(|e| e.status == DecisionStatus::Active)
    }

    /// Whether `artifact_hash` belongs to any active record. Collaborators
    /// serving canon-derived content must refuse hashes for which this is
    /// false.
    #[must_use]
    pub fn is_active_hash(&self, artifact_hash: &str) -> bool {
        self.iter_active().any(|e| e.artifact_hash == artifact_hash)
    }

    /// Verifies that no tuple has more than one active record.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateActive`] naming the first
    /// violated tuple.
    pub fn verify_integrity(&self) -> Result<(), RegistryError> {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for entry in self.iter_active() {
            *counts.entry(entry.equivalence_key()?).or_insert(0) += 1;
        }
        for (key, count) in counts {
            if count > 1 {
                return Err(RegistryError::DuplicateActive {
                    equivalence_key: key,
                    active_count: count,
                });
            }
        }
        Ok(())
    }

    /// Number of records in the log, including superseded history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The audit trail of status transitions.
    #[must_use]
    pub fn audit_log(&self) -> &[AuditEvent] {
        &self.audit_log
    }

    /// Test-only: appends a record verbatim, bypassing upsert semantics.
    /// Used to build corrupted fixtures.
    #[doc(hidden)]
    pub fn push_raw(&mut self, record: DecisionRecord) {
        self.entries.push(record);
    }

    fn active_indices(
        &self,
        kind: &str,
        scope: &DecisionScope,
        identity_fields: &IdentityFields,
    ) -> Result<Vec<usize>, RegistryError> {
        let indices: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.status == DecisionStatus::Active
                    && e.kind == kind
                    && e.scope == *scope
                    && e.identity_fields == *identity_fields
            })
            .map(|(i, _)| i)
            .collect();
        if indices.len() > 1 {
            return Err(RegistryError::DuplicateActive {
                equivalence_key: equivalence_key_for(kind, scope, identity_fields)?,
                active_count: indices.len(),
            });
        }
        Ok(indices)
    }

    fn new_record(
        artifact_path: &str,
        parsed: &ParsedArtifact,
        artifact_hash: &str,
        decision_id: &str,
        supersedes: Vec<String>,
    ) -> DecisionRecord {
        let source_type = match parsed.encoding {
            ArtifactEncoding::HeaderedText => "text",
            ArtifactEncoding::StructuredRecord => "json",
        };
        DecisionRecord {
            decision_id: decision_id.to_string(),
            kind: parsed.kind.clone(),
            scope: parsed.scope.clone(),
            identity_fields: parsed.identity_fields.clone(),
            artifact_path: artifact_path.to_string(),
            artifact_hash: artifact_hash.to_string(),
            equivalence_policy: EquivalencePolicy::for_encoding(parsed.encoding),
            provenance: Provenance {
                source_artifact: artifact_path.to_string(),
                source_type: source_type.to_string(),
                generator: "canondb-core".to_string(),
            },
            status: DecisionStatus::Active,
            supersedes,
        }
    }
}

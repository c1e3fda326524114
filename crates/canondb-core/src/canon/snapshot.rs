//! Point-in-time snapshot of the canon tree.
//!
//! The tree is shared mutable state. Every guard or registry invocation
//! loads it once into an immutable [`CanonSnapshot`] and evaluates against
//! that value, so point-in-time semantics are explicit rather than
//! implicit. No transactional isolation is provided; callers that need a
//! consistent view must not mutate the tree concurrently with a load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::{
    CanonLayout, ClaimsMatrix, ContractError, EvidenceIndex, LifecycleContract, LifecycleIndex,
    ReconstructionCheck, RunManifest,
};
use crate::crypto::sha256_hex;
use crate::determinism::canonical_text_bytes;

/// Errors produced while loading a snapshot.
///
/// These are tree-access failures, not gate failures: a gate that fails
/// is data in the verdict, while a tree that cannot be read at all is an
/// error here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    /// A required canon artifact is missing.
    #[error("missing canon artifact: {path}")]
    MissingArtifact {
        /// The absent path.
        path: PathBuf,
    },

    /// A canon artifact could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The unreadable path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A canon artifact could not be decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// The undecodable path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The lifecycle contract document is malformed.
    #[error("lifecycle contract error: {0}")]
    Contract(#[from] ContractError),
}

/// Resolution of the current-state pointer file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentPointer {
    /// The pointer file is absent or empty.
    Missing,
    /// Exactly one snapshot name is referenced.
    One(String),
    /// More than one snapshot claims to be current. This ambiguity is a
    /// hard failure, never tie-broken.
    Ambiguous(Vec<String>),
}

impl CurrentPointer {
    /// The single referenced snapshot name, when unambiguous.
    #[must_use]
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Self::One(name) => Some(name),
            Self::Missing | Self::Ambiguous(_) => None,
        }
    }

    /// Classifies raw pointer-file content. Non-empty trimmed lines are
    /// the referenced snapshot names.
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        let names: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        match names.len() {
            0 => Self::Missing,
            1 => Self::One(names.into_iter().next().unwrap_or_default()),
            _ => Self::Ambiguous(names),
        }
    }
}

/// One structured canon artifact captured for cross-artifact sweeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredArtifact {
    /// Root-relative path of the artifact.
    pub rel_path: String,
    /// Decoded payload.
    pub value: Value,
}

/// Immutable view of the canon tree at load time.
#[derive(Debug, Clone)]
pub struct CanonSnapshot {
    /// The lifecycle contract payload.
    pub contract: LifecycleContract,
    /// Canonical text hash of the full contract document.
    pub contract_hash: String,
    /// Root-relative path of the contract document.
    pub contract_rel_path: String,
    /// The run manifest.
    pub manifest: RunManifest,
    /// The lifecycle index.
    pub index: LifecycleIndex,
    /// The reconstruction check report.
    pub reconstruction: ReconstructionCheck,
    /// The claims matrix.
    pub claims: ClaimsMatrix,
    /// The evidence index.
    pub evidence: EvidenceIndex,
    /// Resolution of the current-state pointer.
    pub current: CurrentPointer,
    /// Whether the referenced current snapshot file exists.
    pub current_exists: bool,
    /// Root-relative path of the referenced current snapshot, when
    /// unambiguous.
    pub current_rel_path: Option<String>,
    /// Names of persisted snapshots in the system directory.
    pub snapshot_names: Vec<String>,
    /// Every structured canon artifact, for the identity-sentinel sweep.
    pub structured_artifacts: Vec<StructuredArtifact>,
    /// Raw bytes of each evidence-referenced artifact, keyed by
    /// root-relative path; `None` when the file was unreadable at load.
    pub evidence_raw: BTreeMap<String, Option<Vec<u8>>>,
}

impl CanonSnapshot {
    /// Loads a snapshot of the tree at `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when a required canon artifact is
    /// missing, unreadable, or undecodable. Evidence raw files are not
    /// required here; their absence surfaces as a gate violation, not a
    /// load error.
    pub fn load(layout: &CanonLayout) -> Result<Self, SnapshotError> {
        let contract_path = layout.lifecycle_contract();
        let contract_text = read_text(&contract_path)?;
        let contract = LifecycleContract::extract_payload(&contract_text)?;
        let contract_hash = sha256_hex(&canonical_text_bytes(&contract_text));

        let manifest: RunManifest = read_json(&layout.run_manifest())?;
        let index: LifecycleIndex = read_json(&layout.lifecycle_index())?;
        let reconstruction: ReconstructionCheck = read_json(&layout.reconstruction_check())?;
        let claims: ClaimsMatrix = read_json(&layout.claims_matrix())?;
        let evidence: EvidenceIndex = read_json(&layout.evidence_index())?;

        let current = load_current_pointer(&layout.current_pointer())?;
        let current_rel_path = current
            .resolved()
            .map(|name| layout.relative_to_root(&layout.system_dir().join(name)));
        let current_exists = current
            .resolved()
            .is_some_and(|name| layout.system_dir().join(name).is_file());

        let snapshot_names = list_snapshot_names(&layout.system_dir())?;
        let structured_artifacts = load_structured_artifacts(layout)?;

        let mut evidence_raw = BTreeMap::new();
        for slice in &evidence.evidence {
            if slice.raw_file_path.is_empty() {
                continue;
            }
            let raw = std::fs::read(layout.root().join(&slice.raw_file_path)).ok();
            if raw.is_none() {
                tracing::debug!(
                    raw_file_path = %slice.raw_file_path,
                    "evidence raw artifact unreadable at snapshot load"
                );
            }
            evidence_raw.insert(slice.raw_file_path.clone(), raw);
        }

        Ok(Self {
            contract,
            contract_hash,
            contract_rel_path: layout.lifecycle_contract_rel(),
            manifest,
            index,
            reconstruction,
            claims,
            evidence,
            current,
            current_exists,
            current_rel_path,
            snapshot_names,
            structured_artifacts,
            evidence_raw,
        })
    }
}

fn read_text(path: &Path) -> Result<String, SnapshotError> {
    if !path.is_file() {
        return Err(SnapshotError::MissingArtifact {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| SnapshotError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn load_current_pointer(path: &Path) -> Result<CurrentPointer, SnapshotError> {
    if !path.is_file() {
        return Ok(CurrentPointer::Missing);
    }
    let content = read_text(path)?;
    Ok(CurrentPointer::from_content(&content))
}

fn list_snapshot_names(system_dir: &Path) -> Result<Vec<String>, SnapshotError> {
    if !system_dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(system_dir).map_err(|source| SnapshotError::Io {
        path: system_dir.to_path_buf(),
        source,
    })?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SnapshotError::Io {
            path: system_dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != "CURRENT" && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Collects every `.json` artifact under the canon directory, decoded.
fn load_structured_artifacts(layout: &CanonLayout) -> Result<Vec<StructuredArtifact>, SnapshotError> {
    let mut paths = Vec::new();
    collect_json_paths(&layout.canon_dir(), &mut paths)?;
    paths.sort();

    let mut artifacts = Vec::with_capacity(paths.len());
    for path in paths {
        let value: Value = read_json(&path)?;
        artifacts.push(StructuredArtifact {
            rel_path: layout.relative_to_root(&path),
            value,
        });
    }
    Ok(artifacts)
}

fn collect_json_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SnapshotError> {
    if !dir.is_dir() {
        return Ok(());
    }
    let entries = std::fs::read_dir(dir).map_err(|source| SnapshotError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| SnapshotError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_json_paths(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}

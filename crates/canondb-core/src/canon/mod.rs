//! The canon tree: shared durable state multiple workers read and write.
//!
//! The tree is the only coordination medium in the system. This module
//! defines its conventional layout, typed views of its state artifacts,
//! and a point-in-time [`snapshot::CanonSnapshot`] that the guard and
//! registry consume instead of touching the live tree mid-evaluation.

mod contract;
mod evidence;
mod index;
mod manifest;
mod reconstruction;
pub mod snapshot;

pub use contract::{ContractError, LifecycleContract, OrphanOverrideRule, ResourceScopeRules};
pub use evidence::{Claim, ClaimsMatrix, EvidenceIndex, EvidenceSlice};
pub use index::LifecycleIndex;
pub use manifest::RunManifest;
pub use reconstruction::{ReconstructionCheck, ReconstructionSummary, ReconstructionTest};
pub use snapshot::{CanonSnapshot, CurrentPointer, SnapshotError, StructuredArtifact};

use std::path::{Path, PathBuf};

/// Kind under which a lifecycle contract must be registered for the
/// orphan override path to be honored.
pub const LIFECYCLE_CONTRACT_KIND: &str = "lifecycle_contract";

/// Resolves the conventional file locations inside one canon tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonLayout {
    root: PathBuf,
}

impl CanonLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding canon state artifacts.
    #[must_use]
    pub fn canon_dir(&self) -> PathBuf {
        self.root.join("canon")
    }

    /// The run manifest.
    #[must_use]
    pub fn run_manifest(&self) -> PathBuf {
        self.canon_dir().join("run_manifest.json")
    }

    /// The lifecycle contract document.
    #[must_use]
    pub fn lifecycle_contract(&self) -> PathBuf {
        self.canon_dir().join("lifecycle_contract.md")
    }

    /// Root-relative path of the contract document, as recorded in
    /// registry entries.
    #[must_use]
    pub fn lifecycle_contract_rel(&self) -> String {
        "canon/lifecycle_contract.md".to_string()
    }

    /// The lifecycle index.
    #[must_use]
    pub fn lifecycle_index(&self) -> PathBuf {
        self.canon_dir().join("lifecycle_index.json")
    }

    /// The reconstruction check report.
    #[must_use]
    pub fn reconstruction_check(&self) -> PathBuf {
        self.canon_dir().join("reconstruction_check.json")
    }

    /// The claims matrix.
    #[must_use]
    pub fn claims_matrix(&self) -> PathBuf {
        self.canon_dir().join("claims_matrix.json")
    }

    /// The evidence index.
    #[must_use]
    pub fn evidence_index(&self) -> PathBuf {
        self.canon_dir().join("evidence_index.json")
    }

    /// Directory holding persisted state snapshots.
    #[must_use]
    pub fn system_dir(&self) -> PathBuf {
        self.canon_dir().join("system")
    }

    /// The current-state pointer file.
    #[must_use]
    pub fn current_pointer(&self) -> PathBuf {
        self.system_dir().join("CURRENT")
    }

    /// The persisted decision registry.
    #[must_use]
    pub fn registry_file(&self) -> PathBuf {
        self.root.join("registry").join("registry.json")
    }

    /// The registration scan configuration.
    #[must_use]
    pub fn scan_config(&self) -> PathBuf {
        self.root.join("registry").join("scan_config.json")
    }

    /// Renders a path relative to the tree root with forward slashes, the
    /// form every stored `artifact_path` uses.
    #[must_use]
    pub fn relative_to_root(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

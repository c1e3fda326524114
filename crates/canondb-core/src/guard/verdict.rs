//! The guard verdict object.

use std::collections::BTreeMap;

use serde::Serialize;

/// Complete result of one guard evaluation.
///
/// `reasons` is empty exactly when `allowed` is true; every false gate in
/// `checks` contributes at least one reason.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    /// Whether resumption is permitted: the AND of all twelve gates.
    pub allowed: bool,
    /// The contract's lifecycle epoch the evaluation ran against.
    pub lifecycle_id: String,
    /// Per-gate outcomes, keyed by gate name.
    pub checks: BTreeMap<String, bool>,
    /// Orphan snapshot count recorded in the lifecycle index.
    pub orphan_count: u64,
    /// Whether the contract's orphan override is enabled.
    pub override_enabled: bool,
    /// Canonical text hash of the contract document.
    pub contract_hash: String,
    /// `artifact:field` entries where the sentinel value was found.
    pub unset_violations: Vec<String>,
    /// Supported claims lacking evidence references.
    pub supported_claim_violations: Vec<String>,
    /// `evidence_id:code` entries for slices that failed verification.
    pub evidence_hash_violations: Vec<String>,
    /// Human-readable abort reasons, one or more per failed gate.
    pub reasons: Vec<String>,
}

impl Verdict {
    /// Outcome of the named gate, when it exists.
    #[must_use]
    pub fn gate(&self, name: &str) -> Option<bool> {
        self.checks.get(name).copied()
    }
}

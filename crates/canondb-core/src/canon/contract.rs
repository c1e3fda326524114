//! Lifecycle contract: the per-epoch agreement governing managed
//! resources and orphan handling.
//!
//! The contract lives as a fenced ```json payload inside a markdown
//! document, so the same file can carry the human-readable terms and the
//! machine-checked rules. Contracts are never mutated in place; a scope
//! change or mismatch mints a successor with `parent_lifecycle_id`
//! chained to the prior epoch.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while extracting a contract payload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContractError {
    /// The document has no fenced JSON payload.
    #[error("lifecycle contract document is missing a fenced JSON payload")]
    MissingPayload,

    /// The fenced payload does not decode as a contract.
    #[error("lifecycle contract payload is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Rules scoping which resources an epoch manages and what counts as an
/// orphan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourceScopeRules {
    /// Root-relative paths of resources this epoch manages.
    #[serde(default)]
    pub managed_resources: Vec<String>,
    /// Human-readable definition of an orphan snapshot.
    #[serde(default)]
    pub orphan_definition: String,
}

/// Conditions under which resuming with orphan snapshots present is
/// permitted.
///
/// Enabling the override is never sufficient on its own: the contract
/// document granting it must also hold an active registry entry, and no
/// contract field can waive that requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrphanOverrideRule {
    /// Whether the override is enabled at all.
    #[serde(default)]
    pub enabled: bool,
    /// Why the override was granted.
    #[serde(default)]
    pub reason: Option<String>,
    /// Who approved the override.
    #[serde(default)]
    pub approved_by: Option<String>,
    /// When the override was approved.
    #[serde(default)]
    pub approved_at: Option<String>,
}

/// One epoch's lifecycle contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleContract {
    /// Identifier of this epoch.
    pub lifecycle_id: String,
    /// When this contract was minted.
    pub created_at: String,
    /// The epoch this one superseded, if any.
    #[serde(default)]
    pub parent_lifecycle_id: Option<String>,
    /// Branch that owns the epoch.
    #[serde(default)]
    pub owning_branch: String,
    /// Commit that owns the epoch.
    #[serde(default)]
    pub owning_commit: String,
    /// Resource scoping rules.
    #[serde(default)]
    pub resource_scope_rules: ResourceScopeRules,
    /// Invariant that must hold for the epoch to terminate cleanly.
    #[serde(default)]
    pub termination_invariant: String,
    /// Rule governing how a successor epoch is minted.
    #[serde(default)]
    pub successor_rule: String,
    /// Orphan override conditions.
    #[serde(default)]
    pub orphan_override_rule: OrphanOverrideRule,
}

impl LifecycleContract {
    /// Extracts the contract payload from a contract markdown document.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when no fenced JSON payload exists or it
    /// does not decode.
    pub fn extract_payload(document: &str) -> Result<Self, ContractError> {
        // One fenced json block holds the machine-checked payload.
        let fence = Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("static regex");
        let captures = fence
            .captures(document)
            .ok_or(ContractError::MissingPayload)?;
        Ok(serde_json::from_str(&captures[1])?)
    }

    /// Mints the successor contract for the next epoch.
    ///
    /// The successor chains `parent_lifecycle_id` to this epoch, takes
    /// fresh ownership coordinates, and resets the orphan override: an
    /// override never carries across epochs.
    #[must_use]
    pub fn successor(&self, lifecycle_id: &str, owning_branch: &str, owning_commit: &str) -> Self {
        Self {
            lifecycle_id: lifecycle_id.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            parent_lifecycle_id: Some(self.lifecycle_id.clone()),
            owning_branch: owning_branch.to_string(),
            owning_commit: owning_commit.to_string(),
            resource_scope_rules: self.resource_scope_rules.clone(),
            termination_invariant: self.termination_invariant.clone(),
            successor_rule: self.successor_rule.clone(),
            orphan_override_rule: OrphanOverrideRule::default(),
        }
    }
}

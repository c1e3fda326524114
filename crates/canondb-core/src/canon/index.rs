//! Lifecycle index: per-epoch accounting of persisted snapshots.

use serde::{Deserialize, Serialize};

/// The lifecycle index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleIndex {
    /// The epoch this index describes.
    pub lifecycle_id: String,
    /// Number of snapshots not referenced by the current-state pointer.
    #[serde(default)]
    pub orphan_count: u64,
    /// Identifiers of the untracked snapshots.
    #[serde(default)]
    pub untracked_snapshots: Vec<String>,
}

impl LifecycleIndex {
    /// Derives the orphan set from an actual snapshot listing.
    ///
    /// An orphan is any persisted snapshot other than the single one the
    /// current-state pointer references. Index writers and tests share
    /// this definition so recorded counts cannot drift from it.
    #[must_use]
    pub fn derive_orphans(snapshot_names: &[String], current: Option<&str>) -> (u64, Vec<String>) {
        let mut untracked: Vec<String> = snapshot_names
            .iter()
            .filter(|name| Some(name.as_str()) != current)
            .cloned()
            .collect();
        untracked.sort();
        (untracked.len() as u64, untracked)
    }
}

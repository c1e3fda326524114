//! Shared fixture: a complete canon tree on disk that passes every gate.
//!
//! Tests start from the clean tree and break exactly one thing before
//! loading their snapshot.

#![allow(dead_code)]

use std::path::Path;

use canondb_core::canon::CanonLayout;
use canondb_core::crypto::sha256_hex;
use serde_json::json;
use tempfile::TempDir;

pub const LC: &str = "LC-0002";
pub const RAW_EVIDENCE: &[u8] = br#"{"metric": 42}"#;

pub struct CanonTree {
    pub dir: TempDir,
    pub layout: CanonLayout,
}

impl CanonTree {
    /// Builds a tree that passes all twelve gates.
    pub fn passing() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = CanonLayout::new(dir.path());
        let tree = Self { dir, layout };

        tree.write("canon/lifecycle_contract.md", &contract_doc(false));
        tree.write(
            "canon/run_manifest.json",
            &json!({
                "lifecycle_id": LC,
                "decision_scope": {
                    "od_pair": "SFO-JFK",
                    "graph_id": "g-9",
                    "run_id": "r-3"
                },
                "identity_fields": {
                    "repo_commit": "abc123",
                    "objective_hash": "o1",
                    "graph_hash": "g1",
                    "params_hash": "p1"
                }
            })
            .to_string(),
        );
        tree.write(
            "canon/lifecycle_index.json",
            &index_doc(LC, 0, &[]),
        );
        tree.write(
            "canon/reconstruction_check.json",
            &json!({
                "lifecycle_id": LC,
                "reconstructable": true,
                "tests": [
                    {"name": "replay_state", "result": "pass"},
                    {"name": "rehash_inputs", "result": "pass"}
                ],
                "summary": {"status": "pass"}
            })
            .to_string(),
        );
        tree.write(
            "canon/claims_matrix.json",
            &json!({
                "claims": [
                    {"claim_id": "C1", "status": "supported", "evidence_refs": ["EV1"]}
                ]
            })
            .to_string(),
        );
        tree.write_bytes("canon/raw/run.json", RAW_EVIDENCE);
        tree.write(
            "canon/evidence_index.json",
            &json!({
                "evidence": [{
                    "evidence_id": "EV1",
                    "raw_file_path": "canon/raw/run.json",
                    "raw_file_hash": sha256_hex(RAW_EVIDENCE),
                    "slice_hash": sha256_hex(b"42"),
                    "json_pointer": "/metric"
                }]
            })
            .to_string(),
        );
        tree.write(
            "canon/results/summary.json",
            &json!({
                "artifact_kind": "result_summary",
                "lifecycle_id": LC,
                "decision_scope": {
                    "od_pair": "SFO-JFK",
                    "graph_id": "g-9",
                    "run_id": "r-3"
                },
                "identity_fields": {
                    "repo_commit": "abc123",
                    "objective_hash": "o1",
                    "graph_hash": "g1",
                    "params_hash": "p1"
                },
                "best_cost": 1234.5
            })
            .to_string(),
        );
        tree.write("canon/system/state_v2.json", &json!({"state": "v2"}).to_string());
        tree.write("canon/system/CURRENT", "state_v2.json\n");
        tree
    }

    pub fn write(&self, rel: &str, content: &str) {
        self.write_bytes(rel, content.as_bytes());
    }

    pub fn write_bytes(&self, rel: &str, content: &[u8]) {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, content).expect("write fixture file");
    }

    pub fn remove(&self, rel: &str) {
        std::fs::remove_file(self.dir.path().join(rel)).expect("remove fixture file");
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// The contract document: a headered markdown file whose machine payload
/// lives in a fenced JSON block.
pub fn contract_doc(override_enabled: bool) -> String {
    let payload = json!({
        "lifecycle_id": LC,
        "created_at": "2026-08-01T00:00:00Z",
        "parent_lifecycle_id": "LC-0001",
        "owning_branch": "main",
        "owning_commit": "abc123",
        "resource_scope_rules": {
            "managed_resources": ["canon/system/state_v2.json"],
            "orphan_definition": "persisted snapshot not referenced by canon/system/CURRENT"
        },
        "termination_invariant": "every canon artifact holds an active registry entry",
        "successor_rule": "mint a new lifecycle_id with parent_lifecycle_id chained",
        "orphan_override_rule": {
            "enabled": override_enabled,
            "reason": if override_enabled { Some("migration in progress") } else { None },
            "approved_by": if override_enabled { Some("ops") } else { None },
            "approved_at": if override_enabled { Some("2026-08-15T00:00:00Z") } else { None }
        }
    });
    format!(
        "<!--\n\
         LIFECYCLE_ID: {LC}\n\
         DECISION_KIND: lifecycle_contract\n\
         -->\n\
         # Lifecycle contract {LC}\n\
         \n\
         Terms in prose.\n\
         \n\
         ```json\n{}\n```\n",
        serde_json::to_string_pretty(&payload).expect("payload")
    )
}

pub fn index_doc(lifecycle_id: &str, orphan_count: u64, untracked: &[&str]) -> String {
    json!({
        "lifecycle_id": lifecycle_id,
        "orphan_count": orphan_count,
        "untracked_snapshots": untracked
    })
    .to_string()
}

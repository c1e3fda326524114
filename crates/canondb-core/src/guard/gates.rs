//! The twelve resume gates.

use std::collections::BTreeMap;

use super::verdict::Verdict;
use crate::artifact::UNSET_SENTINEL;
use crate::canon::{CanonSnapshot, CurrentPointer, LIFECYCLE_CONTRACT_KIND};
use crate::crypto::sha256_hex;
use crate::determinism::canonical_json_bytes;
use crate::registry::DecisionRegistry;

const IDENTITY_RECORD_KEY: &str = "identity_fields";

/// Evaluates all twelve resume gates over a loaded snapshot and the
/// registry's active set.
///
/// Every gate runs unconditionally; a failing predicate is reported in
/// the verdict, never raised. The registry is expected to have passed
/// [`DecisionRegistry::verify_integrity`] before evaluation.
#[must_use]
pub fn evaluate_resume_gates(
    snapshot: &CanonSnapshot,
    registry: &DecisionRegistry,
    requested_lifecycle_id: Option<&str>,
) -> Verdict {
    let contract_lifecycle = snapshot.contract.lifecycle_id.as_str();
    let orphan_count = snapshot.index.orphan_count;
    let override_rule = &snapshot.contract.orphan_override_rule;

    let mut checks = BTreeMap::new();
    let mut reasons = Vec::new();
    let mut gate = |name: &str, passed: bool, reason: &str| {
        checks.insert(name.to_string(), passed);
        if !passed {
            reasons.push(format!("abort: {reason}"));
        }
    };

    gate(
        "requested_lifecycle_match",
        requested_lifecycle_id.map_or(true, |requested| requested == snapshot.manifest.lifecycle_id),
        "lifecycle_id mismatch against requested lifecycle_id",
    );
    gate(
        "manifest_contract_match",
        snapshot.manifest.lifecycle_id == contract_lifecycle,
        "lifecycle_id mismatch between run manifest and lifecycle contract",
    );
    gate(
        "lifecycle_index_match",
        snapshot.index.lifecycle_id == contract_lifecycle,
        "lifecycle_id mismatch between lifecycle index and lifecycle contract",
    );
    gate(
        "reconstruction_lifecycle_match",
        snapshot.reconstruction.lifecycle_id == contract_lifecycle,
        "lifecycle_id mismatch between reconstruction check and lifecycle contract",
    );

    // Ambiguity is a hard failure, surfaced as its own reason rather than
    // tie-broken to one candidate.
    match &snapshot.current {
        CurrentPointer::Ambiguous(candidates) => {
            gate(
                "current_snapshot_exists",
                false,
                &format!(
                    "multiple snapshots claim to be current: {}",
                    candidates.join(", ")
                ),
            );
        },
        CurrentPointer::Missing | CurrentPointer::One(_) => {
            gate(
                "current_snapshot_exists",
                snapshot.current_exists,
                "current snapshot pointer does not resolve to an existing snapshot",
            );
        },
    }
    gate(
        "current_snapshot_managed",
        snapshot.current_rel_path.as_ref().is_some_and(|rel| {
            snapshot
                .contract
                .resource_scope_rules
                .managed_resources
                .contains(rel)
        }),
        "current snapshot is not in the contract's managed resources",
    );

    // An override is only honored when the contract granting it was
    // itself registered as a decision under this epoch.
    let contract_registered = registry.iter_active().any(|entry| {
        entry.artifact_hash == snapshot.contract_hash
            && entry.kind == LIFECYCLE_CONTRACT_KIND
            && entry.scope.lifecycle_id == contract_lifecycle
    });
    let override_honored = override_rule.enabled && contract_registered;
    let orphans_excused = orphan_count == 0 || override_honored;
    gate(
        "orphan_free",
        orphans_excused,
        "orphan snapshots detected",
    );

    let failed_tests = snapshot.reconstruction.failed_tests();
    if snapshot.reconstruction.reconstructable {
        gate(
            "reconstructable",
            failed_tests.is_empty(),
            &format!("reconstruction test failed: {}", failed_tests.join(", ")),
        );
    } else {
        gate(
            "reconstructable",
            false,
            "reconstruction check reports reconstructable false",
        );
    }

    if orphan_count > 0 && !override_rule.enabled {
        gate(
            "override_enabled_if_needed",
            false,
            "orphan snapshots detected and override is not explicitly enabled",
        );
    } else {
        gate(
            "override_enabled_if_needed",
            orphans_excused,
            "orphan override enabled but the lifecycle contract is not an active registry entry",
        );
    }

    let unset_violations = sweep_identity_sentinels(snapshot);
    gate(
        "no_unset_identity_fields",
        unset_violations.is_empty(),
        &format!("{UNSET_SENTINEL} found in identity fields"),
    );

    let supported_claim_violations = sweep_unsupported_claims(snapshot);
    gate(
        "supported_claims_have_evidence",
        supported_claim_violations.is_empty(),
        "supported claim missing evidence_refs",
    );

    let evidence_hash_violations = sweep_evidence_hashes(snapshot);
    gate(
        "evidence_hashes_match_raw",
        evidence_hash_violations.is_empty(),
        "evidence hash mismatch or invalid evidence record",
    );

    let allowed = reasons.is_empty();
    Verdict {
        allowed,
        lifecycle_id: contract_lifecycle.to_string(),
        checks,
        orphan_count,
        override_enabled: override_rule.enabled,
        contract_hash: snapshot.contract_hash.clone(),
        unset_violations,
        supported_claim_violations,
        evidence_hash_violations,
        reasons,
    }
}

/// Scans every structured canon artifact for sentinel values in its
/// identity record. Violations are `rel_path:field`.
fn sweep_identity_sentinels(snapshot: &CanonSnapshot) -> Vec<String> {
    let mut violations = Vec::new();
    for artifact in &snapshot.structured_artifacts {
        let Some(identity) = artifact
            .value
            .get(IDENTITY_RECORD_KEY)
            .and_then(|v| v.as_object())
        else {
            continue;
        };
        for (field, value) in identity {
            if value.to_string().contains(UNSET_SENTINEL) {
                violations.push(format!("{}:{}", artifact.rel_path, field));
            }
        }
    }
    violations
}

fn sweep_unsupported_claims(snapshot: &CanonSnapshot) -> Vec<String> {
    snapshot
        .claims
        .claims
        .iter()
        .filter(|claim| claim.is_supported() && claim.evidence_refs.is_empty())
        .map(|claim| claim.claim_id.clone())
        .collect()
}

/// Re-verifies every evidence slice against the raw bytes captured at
/// snapshot load. Violations are `evidence_id:code`, one per slice; the
/// first failed check wins and later checks for that slice are skipped.
fn sweep_evidence_hashes(snapshot: &CanonSnapshot) -> Vec<String> {
    let mut violations = Vec::new();
    for slice in &snapshot.evidence.evidence {
        let id = &slice.evidence_id;
        if slice.raw_file_path.is_empty() {
            violations.push(format!("{id}:missing_raw_path"));
            continue;
        }
        if slice.raw_file_hash.contains(UNSET_SENTINEL)
            || slice.slice_hash.contains(UNSET_SENTINEL)
        {
            violations.push(format!("{id}:unset_hash"));
            continue;
        }
        let Some(Some(raw)) = snapshot.evidence_raw.get(&slice.raw_file_path) else {
            violations.push(format!("{id}:raw_missing:{}", slice.raw_file_path));
            continue;
        };
        if sha256_hex(raw) != slice.raw_file_hash {
            violations.push(format!("{id}:raw_hash_mismatch"));
            continue;
        }

        let slice_bytes = match slice.json_pointer.as_deref().filter(|p| !p.is_empty()) {
            Some(pointer) => {
                let pointed = serde_json::from_slice::<serde_json::Value>(raw)
                    .ok()
                    .and_then(|value| value.pointer(pointer).cloned())
                    .and_then(|value| canonical_json_bytes(&value).ok());
                match pointed {
                    Some(bytes) => bytes,
                    None => {
                        violations.push(format!("{id}:invalid_json_pointer"));
                        continue;
                    },
                }
            },
            None => raw.clone(),
        };
        if sha256_hex(&slice_bytes) != slice.slice_hash {
            violations.push(format!("{id}:slice_hash_mismatch"));
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::canon::{
        Claim, ClaimsMatrix, EvidenceIndex, EvidenceSlice, LifecycleContract, LifecycleIndex,
        ReconstructionCheck, RunManifest,
    };
    use crate::canon::snapshot::StructuredArtifact;
    use crate::determinism::canonical_text_bytes;

    const LC: &str = "LC-0002";
    const CURRENT: &str = "canon/system/state_v2.json";

    fn contract() -> LifecycleContract {
        serde_json::from_value(json!({
            "lifecycle_id": LC,
            "created_at": "2026-08-01T00:00:00Z",
            "owning_branch": "main",
            "owning_commit": "abc123",
            "resource_scope_rules": {
                "managed_resources": [CURRENT],
                "orphan_definition": "snapshot not referenced by CURRENT"
            },
            "orphan_override_rule": {"enabled": false}
        }))
        .unwrap()
    }

    fn passing_snapshot() -> CanonSnapshot {
        let contract = contract();
        let contract_text = "contract document body\n";
        let raw = br#"{"metric": 42}"#.to_vec();
        let raw_hash = sha256_hex(&raw);
        let slice_hash = sha256_hex(b"42");

        let mut evidence_raw = BTreeMap::new();
        evidence_raw.insert("canon/raw/run.json".to_string(), Some(raw));

        CanonSnapshot {
            contract,
            contract_hash: sha256_hex(&canonical_text_bytes(contract_text)),
            contract_rel_path: "canon/lifecycle_contract.md".to_string(),
            manifest: RunManifest {
                lifecycle_id: LC.to_string(),
                decision_scope: serde_json::Map::new(),
                identity_fields: serde_json::Map::new(),
            },
            index: LifecycleIndex {
                lifecycle_id: LC.to_string(),
                orphan_count: 0,
                untracked_snapshots: Vec::new(),
            },
            reconstruction: ReconstructionCheck {
                lifecycle_id: LC.to_string(),
                reconstructable: true,
                tests: serde_json::from_value(json!([
                    {"name": "replay_state", "result": "pass"}
                ]))
                .unwrap(),
                summary: serde_json::from_value(json!({"status": "pass"})).unwrap(),
            },
            claims: ClaimsMatrix {
                claims: vec![Claim {
                    claim_id: "C1".to_string(),
                    status: "supported".to_string(),
                    evidence_refs: vec!["EV1".to_string()],
                }],
            },
            evidence: EvidenceIndex {
                evidence: vec![EvidenceSlice {
                    evidence_id: "EV1".to_string(),
                    raw_file_path: "canon/raw/run.json".to_string(),
                    raw_file_hash: raw_hash,
                    slice_hash,
                    json_pointer: Some("/metric".to_string()),
                }],
            },
            current: CurrentPointer::One("state_v2.json".to_string()),
            current_exists: true,
            current_rel_path: Some(CURRENT.to_string()),
            snapshot_names: vec!["state_v2.json".to_string()],
            structured_artifacts: vec![StructuredArtifact {
                rel_path: "canon/results/summary.json".to_string(),
                value: json!({
                    "identity_fields": {
                        "repo_commit": "abc123",
                        "objective_hash": "o1",
                        "graph_hash": "g1",
                        "params_hash": "p1"
                    }
                }),
            }],
            evidence_raw,
        }
    }

    fn assert_only_gate_failed(verdict: &Verdict, failed: &[&str]) {
        assert!(!verdict.allowed);
        assert!(!verdict.reasons.is_empty());
        for (name, passed) in &verdict.checks {
            assert_eq!(
                *passed,
                !failed.contains(&name.as_str()),
                "unexpected outcome for gate {name}"
            );
        }
    }

    #[test]
    fn clean_tree_passes_all_gates() {
        let verdict =
            evaluate_resume_gates(&passing_snapshot(), &DecisionRegistry::new(), Some(LC));
        assert!(verdict.allowed, "reasons: {:?}", verdict.reasons);
        assert!(verdict.reasons.is_empty());
        assert_eq!(verdict.checks.len(), 12);
        assert!(verdict.checks.values().all(|v| *v));
        assert_eq!(verdict.lifecycle_id, LC);
        assert_eq!(verdict.orphan_count, 0);
        assert!(!verdict.override_enabled);
    }

    #[test]
    fn requested_lifecycle_mismatch_fails_one_gate() {
        let verdict = evaluate_resume_gates(
            &passing_snapshot(),
            &DecisionRegistry::new(),
            Some("LC-9999"),
        );
        assert_only_gate_failed(&verdict, &["requested_lifecycle_match"]);
    }

    #[test]
    fn absent_request_defers_to_the_manifest() {
        let verdict = evaluate_resume_gates(&passing_snapshot(), &DecisionRegistry::new(), None);
        assert!(verdict.allowed);
    }

    #[test]
    fn manifest_contract_mismatch_fails_one_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.manifest.lifecycle_id = "LC-0001".to_string();
        // The requested id still matches the manifest; only the
        // manifest/contract pairing is broken.
        let verdict =
            evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some("LC-0001"));
        assert_only_gate_failed(&verdict, &["manifest_contract_match"]);
    }

    #[test]
    fn index_lifecycle_mismatch_fails_one_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.index.lifecycle_id = "LC-0001".to_string();
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["lifecycle_index_match"]);
    }

    #[test]
    fn reconstruction_lifecycle_mismatch_fails_one_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.reconstruction.lifecycle_id = "LC-0001".to_string();
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["reconstruction_lifecycle_match"]);
    }

    #[test]
    fn missing_current_snapshot_fails_one_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.current_exists = false;
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["current_snapshot_exists"]);
    }

    #[test]
    fn unmanaged_current_snapshot_fails_one_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.contract.resource_scope_rules.managed_resources =
            vec!["canon/system/other.json".to_string()];
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["current_snapshot_managed"]);
    }

    #[test]
    fn ambiguous_current_pointer_is_a_hard_failure() {
        let mut snapshot = passing_snapshot();
        snapshot.current = CurrentPointer::Ambiguous(vec![
            "state_v1.json".to_string(),
            "state_v2.json".to_string(),
        ]);
        snapshot.current_exists = false;
        snapshot.current_rel_path = None;
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert!(!verdict.allowed);
        assert_eq!(verdict.gate("current_snapshot_exists"), Some(false));
        assert!(verdict
            .reasons
            .iter()
            .any(|r| r.contains("multiple snapshots claim to be current")));
    }

    #[test]
    fn orphans_without_override_fail_both_orphan_gates() {
        let mut snapshot = passing_snapshot();
        snapshot.index.orphan_count = 1;
        snapshot.index.untracked_snapshots = vec!["scratch.json".to_string()];
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        // An unexcused orphan fails the orphan gate and the override gate
        // together; the override gate is what excuses the orphan gate.
        assert_only_gate_failed(&verdict, &["orphan_free", "override_enabled_if_needed"]);
        assert_eq!(verdict.orphan_count, 1);
    }

    #[test]
    fn override_without_registered_contract_is_not_honored() {
        let mut snapshot = passing_snapshot();
        snapshot.index.orphan_count = 1;
        snapshot.contract.orphan_override_rule.enabled = true;
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["orphan_free", "override_enabled_if_needed"]);
        assert!(verdict
            .reasons
            .iter()
            .any(|r| r.contains("not an active registry entry")));
        assert!(verdict.override_enabled);
    }

    #[test]
    fn contract_cannot_waive_its_own_registration_requirement() {
        let mut snapshot = passing_snapshot();
        snapshot.index.orphan_count = 1;
        // A contract document claiming to waive the registration check is
        // still a local, unregistered edit; the extra field deserializes
        // to nothing and the gate stays closed.
        snapshot.contract = serde_json::from_value(serde_json::json!({
            "lifecycle_id": LC,
            "created_at": "2026-08-01T00:00:00Z",
            "owning_branch": "main",
            "owning_commit": "abc123",
            "resource_scope_rules": {
                "managed_resources": [CURRENT],
                "orphan_definition": "snapshot not referenced by CURRENT"
            },
            "orphan_override_rule": {
                "enabled": true,
                "requires_active_registry_contract_hash": false
            }
        }))
        .unwrap();
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["orphan_free", "override_enabled_if_needed"]);
        assert!(verdict
            .reasons
            .iter()
            .any(|r| r.contains("not an active registry entry")));
    }

    #[test]
    fn registered_override_excuses_orphans() {
        let mut snapshot = passing_snapshot();
        snapshot.index.orphan_count = 1;
        snapshot.contract.orphan_override_rule.enabled = true;

        let mut registry = DecisionRegistry::new();
        registry.push_raw(contract_record(&snapshot.contract_hash));

        let verdict = evaluate_resume_gates(&snapshot, &registry, Some(LC));
        assert!(verdict.allowed, "reasons: {:?}", verdict.reasons);
        assert_eq!(verdict.gate("orphan_free"), Some(true));
        assert_eq!(verdict.gate("override_enabled_if_needed"), Some(true));
    }

    #[test]
    fn non_reconstructable_tree_fails_one_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.reconstruction.reconstructable = false;
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["reconstructable"]);
    }

    #[test]
    fn failed_reconstruction_test_fails_the_gate_by_name() {
        let mut snapshot = passing_snapshot();
        snapshot.reconstruction.tests =
            serde_json::from_value(json!([{"name": "rehash_inputs", "result": "fail"}])).unwrap();
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["reconstructable"]);
        assert!(verdict.reasons.iter().any(|r| r.contains("rehash_inputs")));
    }

    #[test]
    fn sentinel_identity_field_fails_one_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.structured_artifacts[0].value =
            json!({"identity_fields": {"repo_commit": "UNSET"}});
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["no_unset_identity_fields"]);
        assert_eq!(
            verdict.unset_violations,
            vec!["canon/results/summary.json:repo_commit".to_string()]
        );
    }

    #[test]
    fn artifacts_without_identity_records_are_ignored_by_the_sweep() {
        let mut snapshot = passing_snapshot();
        snapshot.structured_artifacts.push(StructuredArtifact {
            rel_path: "canon/results/other.json".to_string(),
            value: json!({"note": "UNSET appears outside identity fields"}),
        });
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert!(verdict.allowed);
    }

    #[test]
    fn unevidenced_supported_claim_fails_one_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.claims.claims[0].evidence_refs.clear();
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["supported_claims_have_evidence"]);
        assert_eq!(verdict.supported_claim_violations, vec!["C1".to_string()]);
    }

    #[test]
    fn refuted_claims_need_no_evidence() {
        let mut snapshot = passing_snapshot();
        snapshot.claims.claims.push(Claim {
            claim_id: "C2".to_string(),
            status: "refuted".to_string(),
            evidence_refs: Vec::new(),
        });
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert!(verdict.allowed);
    }

    #[test]
    fn drifted_raw_artifact_fails_the_evidence_gate() {
        let mut snapshot = passing_snapshot();
        snapshot.evidence_raw.insert(
            "canon/raw/run.json".to_string(),
            Some(br#"{"metric": 43}"#.to_vec()),
        );
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_only_gate_failed(&verdict, &["evidence_hashes_match_raw"]);
        assert_eq!(
            verdict.evidence_hash_violations,
            vec!["EV1:raw_hash_mismatch".to_string()]
        );
    }

    #[test]
    fn slice_hash_drift_is_distinguished_from_raw_drift() {
        let mut snapshot = passing_snapshot();
        snapshot.evidence.evidence[0].slice_hash = "0".repeat(64);
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_eq!(
            verdict.evidence_hash_violations,
            vec!["EV1:slice_hash_mismatch".to_string()]
        );
    }

    #[test]
    fn evidence_violation_codes_cover_malformed_slices() {
        let mut snapshot = passing_snapshot();
        let template = snapshot.evidence.evidence[0].clone();

        let mut no_path = template.clone();
        no_path.evidence_id = "EV2".to_string();
        no_path.raw_file_path = String::new();

        let mut unset = template.clone();
        unset.evidence_id = "EV3".to_string();
        unset.raw_file_hash = "UNSET".to_string();

        let mut missing = template.clone();
        missing.evidence_id = "EV4".to_string();
        missing.raw_file_path = "canon/raw/absent.json".to_string();

        let mut bad_pointer = template;
        bad_pointer.evidence_id = "EV5".to_string();
        bad_pointer.json_pointer = Some("/no_such_field".to_string());

        snapshot
            .evidence
            .evidence
            .extend([no_path, unset, missing, bad_pointer]);
        snapshot
            .evidence_raw
            .insert("canon/raw/absent.json".to_string(), None);

        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert_eq!(
            verdict.evidence_hash_violations,
            vec![
                "EV2:missing_raw_path".to_string(),
                "EV3:unset_hash".to_string(),
                "EV4:raw_missing:canon/raw/absent.json".to_string(),
                "EV5:invalid_json_pointer".to_string(),
            ]
        );
    }

    #[test]
    fn pointerless_slice_hashes_the_whole_raw_file() {
        let mut snapshot = passing_snapshot();
        let raw = br#"{"metric": 42}"#.to_vec();
        snapshot.evidence.evidence[0].json_pointer = None;
        snapshot.evidence.evidence[0].slice_hash = sha256_hex(&raw);
        let verdict = evaluate_resume_gates(&snapshot, &DecisionRegistry::new(), Some(LC));
        assert!(verdict.allowed, "reasons: {:?}", verdict.reasons);
    }

    fn contract_record(contract_hash: &str) -> crate::registry::DecisionRecord {
        use crate::artifact::{DecisionScope, IdentityFields};
        use crate::registry::{DecisionStatus, EquivalencePolicy, Provenance};

        crate::registry::DecisionRecord {
            decision_id: "d".repeat(64),
            kind: crate::canon::LIFECYCLE_CONTRACT_KIND.to_string(),
            scope: DecisionScope {
                od_pair: "SFO-JFK".to_string(),
                graph_id: "g-9".to_string(),
                run_id: "r-3".to_string(),
                lifecycle_id: LC.to_string(),
            },
            identity_fields: IdentityFields {
                repo_commit: "abc123".to_string(),
                objective_hash: "o1".to_string(),
                graph_hash: "g1".to_string(),
                params_hash: "p1".to_string(),
            },
            artifact_path: "canon/lifecycle_contract.md".to_string(),
            artifact_hash: contract_hash.to_string(),
            equivalence_policy: EquivalencePolicy::canonical_text(),
            provenance: Provenance {
                source_artifact: "canon/lifecycle_contract.md".to_string(),
                source_type: "text".to_string(),
                generator: "canondb-core".to_string(),
            },
            status: DecisionStatus::Active,
            supersedes: Vec::new(),
        }
    }
}

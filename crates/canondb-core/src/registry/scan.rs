//! Tree scanning and batch registration.
//!
//! A scan enumerates candidate artifacts under the canon directory (or an
//! explicit known-artifact list), parses each one structurally, and feeds
//! the recognized ones through the registry upsert. Unrecognized files are
//! reported as skipped, not failed; per-artifact parse failures are
//! isolated so one bad file never blocks the rest of the batch. Integrity
//! violations are the exception: an ambiguous current-state pointer or a
//! corrupted registry aborts the whole run before anything is written.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use super::store::{DecisionRegistry, RegistryError};
use crate::artifact::{self, ArtifactDefaults, ParseError};
use crate::canon::{CanonLayout, CurrentPointer, RunManifest};

/// Scan configuration, read from `registry/scan_config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root-relative paths to register. When non-empty, directory
    /// enumeration is bypassed entirely.
    #[serde(default)]
    pub known_artifacts: Vec<String>,
    /// Glob patterns (matched against root-relative paths) excluded from
    /// enumeration.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl ScanConfig {
    /// Loads the configuration file. A missing file yields the default
    /// configuration: enumerate everything, exclude nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the file exists but cannot be read
    /// or decoded.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RegistryError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn exclude_set(&self) -> Result<GlobSet, RegistryError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_globs {
            let glob = Glob::new(pattern).map_err(|err| RegistryError::InvalidGlob {
                pattern: pattern.clone(),
                message: err.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|err| RegistryError::InvalidGlob {
            pattern: self.exclude_globs.join(", "),
            message: err.to_string(),
        })
    }
}

/// One registered artifact in a scan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    /// Root-relative artifact path.
    pub artifact_path: String,
    /// Decision id now active for the artifact.
    pub decision_id: String,
}

/// One artifact that failed to parse during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    /// Root-relative artifact path.
    pub artifact_path: String,
    /// Description of the failure.
    pub error: String,
}

/// Summary of one batch registration run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationReport {
    /// Artifacts that produced a new active record.
    pub created: Vec<ScanEntry>,
    /// Artifacts whose active record already matched.
    pub unchanged: Vec<ScanEntry>,
    /// Files whose shape was not recognized as an artifact.
    pub skipped: Vec<String>,
    /// Artifacts that parsed as one of the recognized shapes but were
    /// missing required fields.
    pub failures: Vec<ScanFailure>,
}

/// Scans the tree rooted at `layout` and registers every recognized
/// artifact, persisting the updated registry before returning.
///
/// # Errors
///
/// Returns [`RegistryError`] when the current-state pointer is ambiguous,
/// the registry already holds duplicate active records, or the registry
/// file cannot be read or written. Per-artifact parse failures do not
/// error; they are reported in [`RegistrationReport::failures`].
pub fn run_registration(
    layout: &CanonLayout,
    config: &ScanConfig,
) -> Result<RegistrationReport, RegistryError> {
    abort_on_ambiguous_pointer(layout)?;

    let registry_path = layout.registry_file();
    let mut registry = DecisionRegistry::load(&registry_path)?;
    registry.verify_integrity()?;

    let defaults = manifest_defaults(layout);
    let candidates = collect_candidates(layout, config)?;

    let mut report = RegistrationReport::default();
    for path in candidates {
        let rel = layout.relative_to_root(&path);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(artifact = %rel, error = %err, "unreadable artifact");
                report.failures.push(ScanFailure {
                    artifact_path: rel,
                    error: err.to_string(),
                });
                continue;
            },
        };
        match artifact::parse_with_defaults(&raw, &defaults) {
            Ok(parsed) => match registry.register(&rel, &parsed, &raw) {
                Ok(outcome) => {
                    let entry = ScanEntry {
                        artifact_path: rel,
                        decision_id: outcome.decision_id,
                    };
                    if outcome.created {
                        report.created.push(entry);
                    } else {
                        report.unchanged.push(entry);
                    }
                },
                // Content that parses leniently but does not canonicalize
                // is a defect of that one artifact, not of the run.
                Err(RegistryError::Canonical(err)) => {
                    tracing::warn!(artifact = %rel, error = %err, "artifact rejected");
                    report.failures.push(ScanFailure {
                        artifact_path: rel,
                        error: err.to_string(),
                    });
                },
                Err(err) => return Err(err),
            },
            Err(ParseError::UnrecognizedShape) => {
                tracing::debug!(artifact = %rel, "not an artifact, skipping");
                report.skipped.push(rel);
            },
            Err(err) => {
                tracing::warn!(artifact = %rel, error = %err, "artifact rejected");
                report.failures.push(ScanFailure {
                    artifact_path: rel,
                    error: err.to_string(),
                });
            },
        }
    }

    registry.save(&registry_path)?;
    tracing::debug!(
        created = report.created.len(),
        unchanged = report.unchanged.len(),
        skipped = report.skipped.len(),
        failures = report.failures.len(),
        "registration scan complete"
    );
    Ok(report)
}

fn abort_on_ambiguous_pointer(layout: &CanonLayout) -> Result<(), RegistryError> {
    let path = layout.current_pointer();
    if !path.is_file() {
        return Ok(());
    }
    let content = std::fs::read_to_string(&path).map_err(|source| RegistryError::Io {
        path: path.clone(),
        source,
    })?;
    if let CurrentPointer::Ambiguous(candidates) = CurrentPointer::from_content(&content) {
        return Err(RegistryError::ConflictingCurrentPointer { candidates });
    }
    Ok(())
}

/// Reads the run manifest for fallback scope and identity records. A
/// missing or unreadable manifest yields empty defaults; any artifact that
/// actually needs them will then fail its own parse, which is the right
/// place for the error to surface.
fn manifest_defaults(layout: &CanonLayout) -> ArtifactDefaults {
    let path = layout.run_manifest();
    let Ok(text) = std::fs::read_to_string(&path) else {
        return ArtifactDefaults::default();
    };
    match serde_json::from_str::<RunManifest>(&text) {
        Ok(manifest) => ArtifactDefaults {
            scope: if manifest.decision_scope.is_empty() {
                None
            } else {
                Some(manifest.decision_scope)
            },
            identity_fields: manifest.identity_fields,
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable run manifest");
            ArtifactDefaults::default()
        },
    }
}

fn collect_candidates(
    layout: &CanonLayout,
    config: &ScanConfig,
) -> Result<Vec<PathBuf>, RegistryError> {
    if !config.known_artifacts.is_empty() {
        return Ok(config
            .known_artifacts
            .iter()
            .map(|rel| layout.root().join(rel))
            .collect());
    }

    let excludes = config.exclude_set()?;
    let mut found = Vec::new();
    walk(&layout.canon_dir(), &mut found);
    found.retain(|path| {
        let rel = layout.relative_to_root(path);
        let keep = !excludes.is_match(&rel);
        if !keep {
            tracing::debug!(artifact = %rel, "excluded by glob");
        }
        keep
    });
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, found);
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("json" | "md")
        ) {
            found.push(path);
        }
    }
}

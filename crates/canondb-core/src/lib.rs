//! # canondb-core
//!
//! Deterministic decision registration and lifecycle guarding for a
//! shared canon tree.
//!
//! A *canon tree* is a filesystem directory of decision artifacts shared
//! by independent workers: contracts, manifests, result records,
//! evidence. This crate keeps that tree trustworthy through two
//! mechanisms:
//!
//! - **Registration** ([`registry`]): every recognized artifact is
//!   canonicalized, hashed, and upserted into an append-only decision
//!   registry. Re-registering unchanged content is a no-op; changed
//!   content supersedes the prior record with an audit trail; ambiguous
//!   active state is refused, never arbitrated.
//! - **Guarding** ([`guard`]): before a worker resumes against the tree,
//!   twelve boolean gates check lifecycle coherence, snapshot hygiene,
//!   reconstructability, and evidence integrity. The guard always
//!   returns a complete [`Verdict`](guard::Verdict); orchestration halts
//!   canon writes whenever `allowed == false`.
//!
//! ## Core Concepts
//!
//! - **Canonical form** ([`determinism`]): key-sorted compact JSON and
//!   LF-normalized trimmed text, so equal content always hashes equal
//! - **Decision tuple**: `(kind, scope, identity_fields)`, the unit of
//!   supersession; at most one active record exists per tuple
//! - **Lifecycle epoch**: a contract-scoped era of the tree identified
//!   by `lifecycle_id`; every canon artifact must agree on it
//! - **Evidence slice** ([`canon`]): a hashed reference into a raw
//!   artifact, optionally addressed by JSON pointer
//!
//! ## Example
//!
//! ```rust
//! use canondb_core::artifact;
//! use canondb_core::registry::DecisionRegistry;
//!
//! let raw = "<!--\n\
//!     LIFECYCLE_ID: LC-0001\n\
//!     DECISION_KIND: spec\n\
//!     DECISION_SCOPE_JSON: {\"od_pair\": \"SFO-JFK\", \"graph_id\": \"g-1\", \"run_id\": \"r-1\"}\n\
//!     DECISION_IDENTITY_FIELDS_JSON: {\"repo_commit\": \"abc\", \"objective_hash\": \"o\", \"graph_hash\": \"g\", \"params_hash\": \"p\"}\n\
//!     -->\n\
//!     # Spec\n";
//!
//! let parsed = artifact::parse(raw)?;
//! let mut registry = DecisionRegistry::new();
//!
//! let first = registry.register("canon/spec.md", &parsed, raw)?;
//! assert!(first.created);
//!
//! // Identical content re-registers as a no-op with the same id.
//! let second = registry.register("canon/spec.md", &parsed, raw)?;
//! assert!(!second.created);
//! assert_eq!(first.decision_id, second.decision_id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod canon;
pub mod crypto;
pub mod determinism;
pub mod guard;
pub mod registry;

pub use artifact::{DecisionScope, IdentityFields, ParseError, ParsedArtifact};
pub use canon::{CanonLayout, CanonSnapshot, SnapshotError};
pub use determinism::CanonicalError;
pub use guard::{evaluate_resume_gates, Verdict};
pub use registry::{DecisionRegistry, RegistrationReport, RegistryError, ScanConfig};

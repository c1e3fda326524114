//! Content-addressed decision registry.
//!
//! The registry is an append-only log of decision records with
//! idempotent-upsert-with-supersession semantics: re-registering
//! unchanged content is a no-op, changed content supersedes the prior
//! active record, and two divergent active records for one tuple is a
//! hard integrity violation that is surfaced, never arbitrated.

mod record;
pub mod scan;
mod store;

pub use record::{
    artifact_hash_for, decision_id_for, equivalence_key_for, AuditEvent, DecisionRecord,
    DecisionStatus, EquivalencePolicy, Provenance,
};
pub use scan::{run_registration, RegistrationReport, ScanConfig, ScanEntry, ScanFailure};
pub use store::{DecisionRegistry, RegisterOutcome, RegistryError, SCHEMA_VERSION};

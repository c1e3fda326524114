//! Claims matrix and evidence index.
//!
//! Claims assert findings; evidence slices pin each claim to hashed raw
//! artifacts. A slice may address a sub-record of a raw JSON file via a
//! JSON pointer, in which case its hash covers the canonical form of the
//! pointed-at value rather than the whole file.

use serde::{Deserialize, Serialize};

/// One claim record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim identifier.
    pub claim_id: String,
    /// Claim status; `"supported"` claims must carry evidence.
    pub status: String,
    /// Evidence slice identifiers backing the claim.
    #[serde(default)]
    pub evidence_refs: Vec<String>,
}

impl Claim {
    /// Whether this claim asserts supported status.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.status.eq_ignore_ascii_case("supported")
    }
}

/// The claims matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClaimsMatrix {
    /// All claim records.
    #[serde(default)]
    pub claims: Vec<Claim>,
}

/// One evidence slice: a hashed reference into a raw artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSlice {
    /// Slice identifier, referenced from claims.
    pub evidence_id: String,
    /// Root-relative path of the raw artifact.
    #[serde(default)]
    pub raw_file_path: String,
    /// Recorded hash of the whole raw artifact.
    #[serde(default)]
    pub raw_file_hash: String,
    /// Recorded hash of the slice itself.
    #[serde(default)]
    pub slice_hash: String,
    /// Optional JSON pointer selecting a sub-record of the raw artifact.
    #[serde(default)]
    pub json_pointer: Option<String>,
}

/// The evidence index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EvidenceIndex {
    /// All evidence slices.
    #[serde(default)]
    pub evidence: Vec<EvidenceSlice>,
}

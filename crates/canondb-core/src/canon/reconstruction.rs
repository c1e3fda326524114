//! Reconstruction check: evidence that the tree's state can be rebuilt
//! from its recorded inputs.

use serde::{Deserialize, Serialize};

/// One reconstruction test entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionTest {
    /// Test name.
    pub name: String,
    /// Test result; anything other than `"pass"` counts as a failure.
    pub result: String,
}

impl ReconstructionTest {
    /// Whether this entry passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.result == "pass"
    }
}

/// Roll-up of the reconstruction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReconstructionSummary {
    /// Overall status reported by the reconstruction tooling.
    #[serde(default)]
    pub status: String,
}

/// The reconstruction check report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionCheck {
    /// The epoch this report was produced under.
    pub lifecycle_id: String,
    /// Whether the tree is reconstructable from recorded inputs.
    #[serde(default)]
    pub reconstructable: bool,
    /// Individual test entries.
    #[serde(default)]
    pub tests: Vec<ReconstructionTest>,
    /// Roll-up summary.
    #[serde(default)]
    pub summary: ReconstructionSummary,
}

impl ReconstructionCheck {
    /// Names of the test entries that did not pass.
    #[must_use]
    pub fn failed_tests(&self) -> Vec<&str> {
        self.tests
            .iter()
            .filter(|t| !t.passed())
            .map(|t| t.name.as_str())
            .collect()
    }
}

//! Run manifest: the tree's declaration of the active epoch and the
//! default scope/identity records artifacts inherit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    /// The lifecycle epoch this tree is operating under.
    pub lifecycle_id: String,
    /// Default decision scope for artifacts that omit their own.
    #[serde(default)]
    pub decision_scope: Map<String, Value>,
    /// Default identity fields, merged under artifact-declared ones.
    #[serde(default)]
    pub identity_fields: Map<String, Value>,
}

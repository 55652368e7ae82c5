//! Temporal subsystem configuration.

use serde::{Deserialize, Serialize};

/// Defaults applied by the temporal engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Semantic type given to new space-time datasets when none is supplied.
    pub default_semantic_type: String,
    /// Creator recorded on new datasets; `None` uses the login name.
    pub default_creator: Option<String>,
    /// Recompute and persist derived dataset metadata after every
    /// register/unregister.
    pub refresh_on_register: bool,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            default_semantic_type: String::from("mean"),
            default_creator: None,
            refresh_on_register: true,
        }
    }
}

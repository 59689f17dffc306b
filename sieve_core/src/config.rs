//! Settings applied to an assembled specification tree

use crate::error::Result;
use crate::spec::Spec;
use crate::types::Policy;
use serde::{Deserialize, Serialize};

/// Tree-wide evaluation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Append `(got: <candidate>)` to failure messages
    #[serde(default = "default_true")]
    pub include_candidate_in_error: bool,

    /// Child visiting policy for every AND/OR node
    #[serde(default)]
    pub policy: Policy,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_candidate_in_error: true,
            policy: Policy::ShortCircuit,
        }
    }
}

impl Settings {
    /// Read settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        tracing::debug!(
            include_candidate_in_error = settings.include_candidate_in_error,
            policy = ?settings.policy,
            "Loaded settings"
        );
        Ok(settings)
    }
}

impl<T: ?Sized> Spec<T> {
    /// Apply `settings` to every node of the tree
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.node
            .set_include_candidate(settings.include_candidate_in_error);
        self.node.set_policy(settings.policy);
        self
    }
}

//! Policy gate configuration.

use serde::{Deserialize, Serialize};

/// Whether a policy gate is part of this deployment.
///
/// Disabling the gate is an explicit deployment decision that is logged at
/// startup. A configured-but-unreachable gate is a different situation and
/// is handled fail-closed at evaluation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    #[default]
    Enabled,
    Disabled,
}

/// Configuration for the policy decision service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub mode: PolicyMode,

    /// Policy decision endpoint, queried with `{"input": <profile>}`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Round-trip timeout for one evaluation, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mode: PolicyMode::default(),
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:8181/v1/data/access/policy".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

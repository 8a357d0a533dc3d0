//! Advisory recommender configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the entitlement recommendation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Whether the advisory step runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Chat-completions base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable containing the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    /// Round-trip timeout for one recommendation, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AdvisoryConfig {
    /// Resolve the API key from the environment.
    pub fn api_key(&self) -> Option<String> {
        super::resolve_env(&self.api_key_env)
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_timeout_secs() -> u64 {
    15
}

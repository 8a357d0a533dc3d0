//! Configuration types for the Provia provisioning orchestrator.
//!
//! Configuration is loaded from a single TOML file (`provia.toml` by
//! default) into a `ProviaConfig` structure. Secrets are never stored in
//! the file itself; secret-bearing fields use `*_env` indirection and are
//! resolved from the environment at startup.

pub mod advisory;
pub mod audit;
pub mod backends;
pub mod dashboard;
pub mod policy;
pub mod server;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use advisory::AdvisoryConfig;
pub use audit::AuditConfig;
pub use backends::{BackendsConfig, CloudIamConfig, DirectoryConfig, GovernanceConfig};
pub use dashboard::DashboardConfig;
pub use policy::{PolicyConfig, PolicyMode};
pub use server::ServerConfig;

/// Complete Provia configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviaConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Audit-log dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Policy gate settings.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Advisory recommender settings.
    #[serde(default)]
    pub advisory: AdvisoryConfig,

    /// Identity backend settings. An omitted backend section means the
    /// corresponding adapter runs inert and reports `unavailable`.
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Per-call timeout applied to every backend adapter call, in seconds.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl ProviaConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let cfg: ProviaConfig = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(cfg)
    }
}

impl Default for ProviaConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            dashboard: DashboardConfig::default(),
            audit: AuditConfig::default(),
            policy: PolicyConfig::default(),
            advisory: AdvisoryConfig::default(),
            backends: BackendsConfig::default(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

fn default_call_timeout_secs() -> u64 {
    10
}

/// Errors loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Resolve a secret named by an optional environment-variable reference.
pub(crate) fn resolve_env(var: &Option<String>) -> Option<String> {
    var.as_deref().and_then(|name| std::env::var(name).ok())
}

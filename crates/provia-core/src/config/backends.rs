//! Identity backend configuration.
//!
//! Each backend section is optional. An omitted section means the adapter
//! for that backend is installed inert: it stays in the fan-out and
//! reports `unavailable` instead of failing at startup.

use serde::{Deserialize, Serialize};

/// Per-backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendsConfig {
    /// Directory service (Entra-style Graph API).
    #[serde(default)]
    pub directory: Option<DirectoryConfig>,

    /// Cloud SSO service (SCIM 2.0 provisioning endpoint).
    #[serde(default)]
    pub cloud: Option<CloudIamConfig>,

    /// Governance / compliance service.
    #[serde(default)]
    pub governance: Option<GovernanceConfig>,
}

/// Directory service credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub tenant_id: String,
    pub client_id: String,

    /// Environment variable containing the client secret.
    #[serde(default = "default_client_secret_env")]
    pub client_secret_env: Option<String>,

    /// OAuth token endpoint base. Overridable for tests.
    #[serde(default = "default_login_base_url")]
    pub login_base_url: String,

    /// Graph API base. Overridable for tests.
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
}

impl DirectoryConfig {
    pub fn client_secret(&self) -> Option<String> {
        super::resolve_env(&self.client_secret_env)
    }
}

/// Cloud SSO SCIM endpoint and bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudIamConfig {
    /// SCIM 2.0 base URL (tenant-specific).
    pub base_url: String,

    /// Environment variable containing the SCIM bearer token.
    #[serde(default = "default_cloud_token_env")]
    pub token_env: Option<String>,
}

impl CloudIamConfig {
    pub fn token(&self) -> Option<String> {
        super::resolve_env(&self.token_env)
    }
}

/// Governance service endpoint and bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    pub base_url: String,

    /// Environment variable containing the API token.
    #[serde(default = "default_governance_token_env")]
    pub token_env: Option<String>,
}

impl GovernanceConfig {
    pub fn token(&self) -> Option<String> {
        super::resolve_env(&self.token_env)
    }
}

fn default_client_secret_env() -> Option<String> {
    Some("ENTRA_CLIENT_SECRET".to_string())
}

fn default_login_base_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_cloud_token_env() -> Option<String> {
    Some("CLOUD_SCIM_TOKEN".to_string())
}

fn default_governance_token_env() -> Option<String> {
    Some("GOVERNANCE_API_TOKEN".to_string())
}

//! Audit-log dashboard configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the audit-log dashboard.
///
/// The dashboard is protected by HTTP Basic credentials. The password can
/// be given inline or, preferably, via an environment variable reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Whether the dashboard route is served at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Basic-auth username.
    #[serde(default = "default_username")]
    pub username: String,

    /// Basic-auth password (prefer `password_env`).
    #[serde(default)]
    pub password: Option<String>,

    /// Environment variable containing the password.
    #[serde(default)]
    pub password_env: Option<String>,

    /// Maximum number of records rendered per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl DashboardConfig {
    /// Get the password, checking `password_env` first.
    pub fn get_password(&self) -> Option<String> {
        super::resolve_env(&self.password_env).or_else(|| self.password.clone())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            username: default_username(),
            password: None,
            password_env: None,
            page_size: default_page_size(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_page_size() -> usize {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_env_takes_precedence() {
        let cfg = DashboardConfig {
            password: Some("inline".to_string()),
            password_env: Some("PROVIA_TEST_DASH_PASS".to_string()),
            ..Default::default()
        };

        unsafe { std::env::set_var("PROVIA_TEST_DASH_PASS", "from-env") };
        assert_eq!(cfg.get_password().as_deref(), Some("from-env"));
        unsafe { std::env::remove_var("PROVIA_TEST_DASH_PASS") };
        assert_eq!(cfg.get_password().as_deref(), Some("inline"));
    }
}

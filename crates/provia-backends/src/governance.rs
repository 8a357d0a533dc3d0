//! Governance service adapter (SailPoint-style v3 API).

use async_trait::async_trait;
use std::time::Duration;

use provia_core::{BackendOutcome, GovernanceConfig, UserProfile};

use crate::directory::{expect_no_content, read_json_body};
use crate::error::BackendError;
use crate::traits::{into_outcome, BackendAdapter};

pub const GOVERNANCE_BACKEND: &str = "governance";

/// Bearer-token adapter for the governance backend.
pub struct GovernanceAdapter {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GovernanceAdapter {
    /// Build the adapter, resolving the API token from the environment.
    pub fn from_config(config: &GovernanceConfig, timeout: Duration) -> Option<Self> {
        let token = config.token()?;
        let client = reqwest::Client::builder().timeout(timeout).build().ok()?;
        Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn users_url(&self) -> String {
        format!("{}/api/v3/users", self.base_url)
    }

    fn user_payload(profile: &UserProfile) -> serde_json::Value {
        serde_json::json!({
            "name": profile.display_name,
            "email": profile.email,
            "displayName": profile.display_name,
            "externalId": profile.external_id(),
            "attributes": {
                "jobTitle": profile.job_title,
                "department": profile.department,
                "location": profile.location,
                "costcenter": profile.cost_center,
                "region": profile.region,
            },
        })
    }

    async fn try_create(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let response = self
            .client
            .post(self.users_url())
            .bearer_auth(&self.token)
            .json(&Self::user_payload(profile))
            .send()
            .await?;
        read_json_body(response).await
    }

    async fn try_update(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let response = self
            .client
            .patch(format!("{}/{}", self.users_url(), profile.external_id()))
            .bearer_auth(&self.token)
            .json(&Self::user_payload(profile))
            .send()
            .await?;
        expect_no_content(response, "updated").await
    }

    async fn try_delete(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.users_url(), profile.external_id()))
            .bearer_auth(&self.token)
            .send()
            .await?;
        expect_no_content(response, "deleted").await
    }
}

#[async_trait]
impl BackendAdapter for GovernanceAdapter {
    fn name(&self) -> &str {
        GOVERNANCE_BACKEND
    }

    async fn create_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(GOVERNANCE_BACKEND, self.try_create(profile).await)
    }

    async fn update_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(GOVERNANCE_BACKEND, self.try_update(profile).await)
    }

    async fn delete_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(GOVERNANCE_BACKEND, self.try_delete(profile).await)
    }
}

//! Cloud SSO adapter (SCIM 2.0 provisioning endpoint).
//!
//! IAM Identity Center exposes user provisioning through a tenant-specific
//! SCIM endpoint with a bearer token. Create posts a core SCIM user;
//! update and delete resolve the SCIM id by `userName` first, so a delete
//! for a never-created subject surfaces the backend's own not-found error.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use provia_core::{BackendOutcome, CloudIamConfig, UserProfile};

use crate::directory::{expect_no_content, read_json_body};
use crate::error::BackendError;
use crate::traits::{into_outcome, BackendAdapter};

pub const CLOUD_BACKEND: &str = "cloud_iam";

const SCIM_USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
const SCIM_PATCH_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

#[derive(Debug, Deserialize)]
struct ScimListResponse {
    #[serde(rename = "Resources", default)]
    resources: Vec<ScimResource>,
}

#[derive(Debug, Deserialize)]
struct ScimResource {
    id: String,
}

/// SCIM adapter for the cloud SSO backend.
pub struct CloudIamAdapter {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl CloudIamAdapter {
    /// Build the adapter, resolving the bearer token from the environment.
    pub fn from_config(config: &CloudIamConfig, timeout: Duration) -> Option<Self> {
        let token = config.token()?;
        let client = reqwest::Client::builder().timeout(timeout).build().ok()?;
        Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn users_url(&self) -> String {
        format!("{}/Users", self.base_url)
    }

    fn scim_user(profile: &UserProfile) -> serde_json::Value {
        serde_json::json!({
            "schemas": [SCIM_USER_SCHEMA],
            "userName": profile.email,
            "externalId": profile.external_id(),
            "displayName": profile.display_name,
            "title": profile.job_title,
            "active": true,
            "emails": [
                { "value": profile.email, "type": "work", "primary": true }
            ],
        })
    }

    /// Resolve the SCIM resource id for a subject by `userName`.
    async fn resolve_id(&self, email: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .get(self.users_url())
            .bearer_auth(&self.token)
            .query(&[("filter", format!("userName eq \"{email}\""))])
            .send()
            .await?;

        let body = read_json_body(response).await?;
        let list: ScimListResponse = serde_json::from_value(body)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        list.resources
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| BackendError::NotFound(email.to_string()))
    }

    async fn try_create(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let response = self
            .client
            .post(self.users_url())
            .bearer_auth(&self.token)
            .json(&Self::scim_user(profile))
            .send()
            .await?;
        read_json_body(response).await
    }

    async fn try_update(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let id = self.resolve_id(&profile.email).await?;
        let patch = serde_json::json!({
            "schemas": [SCIM_PATCH_SCHEMA],
            "Operations": [
                { "op": "replace", "path": "displayName", "value": profile.display_name },
                { "op": "replace", "path": "title", "value": profile.job_title },
            ],
        });

        let response = self
            .client
            .patch(format!("{}/{id}", self.users_url()))
            .bearer_auth(&self.token)
            .json(&patch)
            .send()
            .await?;
        expect_no_content(response, "updated").await
    }

    async fn try_delete(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let id = self.resolve_id(&profile.email).await?;
        let response = self
            .client
            .delete(format!("{}/{id}", self.users_url()))
            .bearer_auth(&self.token)
            .send()
            .await?;
        expect_no_content(response, "deleted").await
    }
}

#[async_trait]
impl BackendAdapter for CloudIamAdapter {
    fn name(&self) -> &str {
        CLOUD_BACKEND
    }

    async fn create_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(CLOUD_BACKEND, self.try_create(profile).await)
    }

    async fn update_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(CLOUD_BACKEND, self.try_update(profile).await)
    }

    async fn delete_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(CLOUD_BACKEND, self.try_delete(profile).await)
    }
}

//! Directory service adapter (Entra-style Graph API).
//!
//! Authenticates with the client-credentials grant and manages users via
//! the Graph `/users` collection. The token is fetched per call; the
//! upstream caches tokens server-side and the fan-out volume here does not
//! justify a cache with refresh handling.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use provia_core::{BackendOutcome, DirectoryConfig, UserProfile};

use crate::error::BackendError;
use crate::traits::{into_outcome, BackendAdapter};

pub const DIRECTORY_BACKEND: &str = "directory";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Graph API adapter for the directory backend.
pub struct DirectoryAdapter {
    client: reqwest::Client,
    config: DirectoryConfig,
    client_secret: String,
}

impl DirectoryAdapter {
    /// Build the adapter, resolving the client secret from the environment.
    ///
    /// Returns `None` when the secret cannot be resolved; the caller
    /// installs an inert adapter in that case.
    pub fn from_config(config: &DirectoryConfig, timeout: Duration) -> Option<Self> {
        let client_secret = config.client_secret()?;
        let client = reqwest::Client::builder().timeout(timeout).build().ok()?;
        Some(Self {
            client,
            config: config.clone(),
            client_secret,
        })
    }

    async fn access_token(&self) -> Result<String, BackendError> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.login_base_url.trim_end_matches('/'),
            self.config.tenant_id
        );
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("scope", "https://graph.microsoft.com/.default"),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Auth(format!(
                "token endpoint returned status {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        Ok(token.access_token)
    }

    fn user_url(&self, email: &str) -> String {
        format!(
            "{}/users/{}",
            self.config.graph_base_url.trim_end_matches('/'),
            email
        )
    }

    fn mail_nickname(email: &str) -> &str {
        email.split('@').next().unwrap_or(email)
    }

    async fn try_create(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let token = self.access_token().await?;
        let nickname = Self::mail_nickname(&profile.email);
        let display_name = profile.display_name.as_deref().unwrap_or(nickname);

        // New accounts get a throwaway password that must be rotated at
        // first sign-in.
        let payload = serde_json::json!({
            "accountEnabled": true,
            "displayName": display_name,
            "mailNickname": nickname,
            "userPrincipalName": profile.email,
            "jobTitle": profile.job_title,
            "department": profile.department,
            "officeLocation": profile.location,
            "passwordProfile": {
                "forceChangePasswordNextSignIn": true,
                "password": format!("Tmp!{}", Uuid::new_v4()),
            },
        });

        let url = format!(
            "{}/users",
            self.config.graph_base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await?;
        read_json_body(response).await
    }

    async fn try_update(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let token = self.access_token().await?;
        let payload = serde_json::json!({
            "displayName": profile.display_name,
            "jobTitle": profile.job_title,
            "department": profile.department,
            "officeLocation": profile.location,
        });

        let response = self
            .client
            .patch(self.user_url(&profile.email))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await?;
        expect_no_content(response, "updated").await
    }

    async fn try_delete(&self, profile: &UserProfile) -> Result<serde_json::Value, BackendError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .delete(self.user_url(&profile.email))
            .bearer_auth(&token)
            .send()
            .await?;
        expect_no_content(response, "deleted").await
    }
}

#[async_trait]
impl BackendAdapter for DirectoryAdapter {
    fn name(&self) -> &str {
        DIRECTORY_BACKEND
    }

    async fn create_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(DIRECTORY_BACKEND, self.try_create(profile).await)
    }

    async fn update_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(DIRECTORY_BACKEND, self.try_update(profile).await)
    }

    async fn delete_user(&self, profile: &UserProfile) -> BackendOutcome {
        into_outcome(DIRECTORY_BACKEND, self.try_delete(profile).await)
    }
}

/// Read a success body as JSON, mapping non-success statuses (including 404)
/// into classified errors.
pub(crate) async fn read_json_body(
    response: reqwest::Response,
) -> Result<serde_json::Value, BackendError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(BackendError::NotFound(body_text(response).await));
    }
    if !status.is_success() {
        return Err(BackendError::UnexpectedStatus {
            status: status.as_u16(),
            body: body_text(response).await,
        });
    }
    response
        .json()
        .await
        .map_err(|e| BackendError::MalformedResponse(e.to_string()))
}

/// Accept an empty success response (204-style endpoints).
pub(crate) async fn expect_no_content(
    response: reqwest::Response,
    verb: &str,
) -> Result<serde_json::Value, BackendError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(BackendError::NotFound(body_text(response).await));
    }
    if !status.is_success() {
        return Err(BackendError::UnexpectedStatus {
            status: status.as_u16(),
            body: body_text(response).await,
        });
    }
    Ok(serde_json::json!({ "status": verb }))
}

async fn body_text(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use provia_core::BackendStatus;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> DirectoryConfig {
        unsafe { std::env::set_var("PROVIA_TEST_ENTRA_SECRET", "s3cret") };
        DirectoryConfig {
            tenant_id: "tenant-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret_env: Some("PROVIA_TEST_ENTRA_SECRET".to_string()),
            login_base_url: server.uri(),
            graph_base_url: server.uri(),
        }
    }

    fn adapter_for(server: &MockServer) -> DirectoryAdapter {
        DirectoryAdapter::from_config(&config_for(server), Duration::from_secs(2)).unwrap()
    }

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "graph-token"})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn create_posts_graph_user() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(header("authorization", "Bearer graph-token"))
            .and(body_string_contains("ada@example.com"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "u-1"})),
            )
            .mount(&server)
            .await;

        let outcome = adapter_for(&server)
            .create_user(&UserProfile::new("ada@example.com"))
            .await;
        assert_eq!(outcome.status, BackendStatus::Success);
        assert_eq!(outcome.detail["id"], "u-1");
    }

    #[tokio::test]
    async fn token_failure_becomes_error_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let outcome = adapter_for(&server)
            .create_user(&UserProfile::new("ada@example.com"))
            .await;
        assert_eq!(outcome.status, BackendStatus::Error);
        assert!(outcome.detail.as_str().unwrap().contains("authentication"));
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/users/ghost@example.com"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let outcome = adapter_for(&server)
            .delete_user(&UserProfile::new("ghost@example.com"))
            .await;
        assert_eq!(outcome.status, BackendStatus::Error);
        assert!(outcome.detail.as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn update_accepts_empty_success() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/users/ada@example.com"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let outcome = adapter_for(&server)
            .update_user(&UserProfile::new("ada@example.com"))
            .await;
        assert_eq!(outcome.status, BackendStatus::Success);
        assert_eq!(outcome.detail["status"], "updated");
    }

    #[test]
    fn missing_secret_yields_no_adapter() {
        let config = DirectoryConfig {
            tenant_id: "t".to_string(),
            client_id: "c".to_string(),
            client_secret_env: Some("PROVIA_TEST_UNSET_SECRET".to_string()),
            login_base_url: "http://localhost".to_string(),
            graph_base_url: "http://localhost".to_string(),
        };
        assert!(DirectoryAdapter::from_config(&config, Duration::from_secs(1)).is_none());
    }
}

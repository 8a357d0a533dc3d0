//! Policy gate for provisioning requests.
//!
//! A gate evaluates a `UserProfile` against policy before any backend is
//! touched. Two implementations exist:
//!
//! - [`HttpPolicyGate`]: queries an OPA-style decision endpoint with
//!   `{"input": <profile>}` and reads the decision from the `result`
//!   envelope.
//! - [`StaticGate`]: a fixed decision for deployments that explicitly run
//!   without a policy service.
//!
//! Gates return `Result<PolicyDecision, PolicyError>`; the fail-closed
//! conversion of errors into a deny is the orchestrator's job, so the
//! behavior stays visible and testable at the workflow level.

pub mod error;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use provia_core::{PolicyConfig, PolicyDecision, UserProfile};

pub use error::PolicyError;

/// A policy decision point for provisioning requests.
#[async_trait]
pub trait PolicyGate: Send + Sync {
    async fn evaluate(&self, profile: &UserProfile) -> Result<PolicyDecision, PolicyError>;
}

/// OPA-style `data` API envelope: `{"result": {"allow": ..., "reason": ...}}`.
#[derive(Debug, Deserialize)]
struct DecisionEnvelope {
    result: Option<RawDecision>,
}

#[derive(Debug, Deserialize)]
struct RawDecision {
    #[serde(default)]
    allow: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// HTTP policy gate querying an OPA-style decision endpoint.
pub struct HttpPolicyGate {
    client: reqwest::Client,
    url: String,
}

impl HttpPolicyGate {
    pub fn new(config: &PolicyConfig) -> Result<Self, PolicyError> {
        if config.url.is_empty() {
            return Err(PolicyError::InvalidConfiguration(
                "policy url is empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(PolicyError::Transport)?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl PolicyGate for HttpPolicyGate {
    async fn evaluate(&self, profile: &UserProfile) -> Result<PolicyDecision, PolicyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "input": profile }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PolicyError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let envelope: DecisionEnvelope = response
            .json()
            .await
            .map_err(|e| PolicyError::MalformedResponse(e.to_string()))?;

        // An empty result document means no policy matched; treat it as a
        // deny rather than guessing.
        let raw = envelope.result.ok_or_else(|| {
            PolicyError::MalformedResponse("missing result document".to_string())
        })?;

        tracing::debug!(
            subject = %profile.email,
            allow = raw.allow,
            "policy gate decision"
        );

        Ok(PolicyDecision {
            allow: raw.allow,
            reason: raw.reason,
        })
    }
}

/// Fixed-decision gate for deployments without a policy service.
///
/// Installing this gate is an explicit configuration choice; the server
/// logs it at startup so a permissive deployment is never silent.
pub struct StaticGate {
    decision: PolicyDecision,
}

impl StaticGate {
    pub fn allow_all() -> Self {
        Self {
            decision: PolicyDecision::allow("policy gate disabled by configuration"),
        }
    }

    pub fn deny_all(reason: impl Into<String>) -> Self {
        Self {
            decision: PolicyDecision::deny(reason),
        }
    }
}

#[async_trait]
impl PolicyGate for StaticGate {
    async fn evaluate(&self, _profile: &UserProfile) -> Result<PolicyDecision, PolicyError> {
        Ok(self.decision.clone())
    }
}

//! OpenAI chat-completions recommender.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use provia_core::{AdvisoryConfig, AdvisoryResult, UserProfile};

use crate::Recommender;

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completions response body, reduced to what we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Recommender backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiRecommender {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiRecommender {
    /// Build a recommender from configuration.
    ///
    /// Returns `None` when the step is disabled or no API key is resolvable;
    /// callers install a `DisabledRecommender` in that case.
    pub fn from_config(config: &AdvisoryConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let api_key = config.api_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .ok()?;
        Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn prompt(profile: &UserProfile) -> String {
        let mut lines = vec![
            "Given the following user profile, suggest access entitlements:".to_string(),
            format!("Email: {}", profile.email),
        ];
        if let Some(title) = &profile.job_title {
            lines.push(format!("Job Title: {title}"));
        }
        if let Some(department) = &profile.department {
            lines.push(format!("Department: {department}"));
        }
        if let Some(location) = &profile.location {
            lines.push(format!("Location: {location}"));
        }
        if let Some(region) = &profile.region {
            lines.push(format!("Region: {region}"));
        }
        lines.push("Return a JSON object with recommended entitlements.".to_string());
        lines.join("\n")
    }

    async fn complete(&self, profile: &UserProfile) -> Result<String, String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::prompt(profile),
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("advisory request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("advisory model returned status {status}"));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed advisory response: {e}"))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "advisory response contained no choices".to_string())
    }
}

#[async_trait]
impl Recommender for OpenAiRecommender {
    async fn recommend(&self, profile: &UserProfile) -> AdvisoryResult {
        match self.complete(profile).await {
            Ok(entitlements) => AdvisoryResult::entitlements(entitlements),
            Err(message) => {
                tracing::warn!(subject = %profile.email, error = %message, "advisory step failed");
                AdvisoryResult::error(message)
            }
        }
    }
}

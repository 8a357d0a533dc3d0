//! Advisory entitlement recommendations.
//!
//! The recommender suggests access entitlements for a new user profile.
//! It is strictly best-effort: every failure mode (missing key, transport
//! error, malformed model response) is captured into
//! `AdvisoryResult::error` and the surrounding workflow never sees an
//! error from this crate. `recommend` is a total function.

pub mod openai;

use async_trait::async_trait;

use provia_core::{AdvisoryResult, UserProfile};

pub use openai::OpenAiRecommender;

/// Best-effort entitlement recommender.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, profile: &UserProfile) -> AdvisoryResult;
}

/// Recommender installed when the advisory step is disabled or unusable.
pub struct DisabledRecommender {
    reason: String,
}

impl DisabledRecommender {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Recommender for DisabledRecommender {
    async fn recommend(&self, _profile: &UserProfile) -> AdvisoryResult {
        AdvisoryResult::error(self.reason.clone())
    }
}

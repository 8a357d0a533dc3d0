//! Present-but-inert adapter for unconfigured backends.

use async_trait::async_trait;

use provia_core::{BackendOutcome, UserProfile};

use crate::traits::BackendAdapter;

/// Adapter installed when a backend section is missing from configuration.
///
/// It stays in the fan-out so every result carries an outcome for every
/// known backend, and reports `unavailable` with a fixed message instead
/// of failing at startup.
pub struct InertAdapter {
    name: String,
    message: String,
}

impl InertAdapter {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    fn outcome(&self) -> BackendOutcome {
        BackendOutcome::unavailable(&self.name, &self.message)
    }
}

#[async_trait]
impl BackendAdapter for InertAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_user(&self, _profile: &UserProfile) -> BackendOutcome {
        self.outcome()
    }

    async fn update_user(&self, _profile: &UserProfile) -> BackendOutcome {
        self.outcome()
    }

    async fn delete_user(&self, _profile: &UserProfile) -> BackendOutcome {
        self.outcome()
    }
}

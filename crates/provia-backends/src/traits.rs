//! Backend adapter capability contract.

use async_trait::async_trait;

use provia_core::{BackendOutcome, UserProfile};

use crate::error::BackendError;

/// Uniform capability set over one external identity system.
///
/// Contract: no method may panic or return an error across the
/// orchestrator boundary. Internal failures are converted into a
/// `BackendOutcome` with `error` or `unavailable` status. Adapters are
/// process-wide and hold no per-call mutable state; calls may run
/// concurrently with calls to other adapters and with calls to the same
/// adapter for different subjects.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Configured backend name used in results and audit summaries.
    fn name(&self) -> &str;

    async fn create_user(&self, profile: &UserProfile) -> BackendOutcome;
    async fn update_user(&self, profile: &UserProfile) -> BackendOutcome;
    async fn delete_user(&self, profile: &UserProfile) -> BackendOutcome;
}

/// Convert an adapter-internal result into the boundary outcome.
pub(crate) fn into_outcome(
    name: &str,
    result: Result<serde_json::Value, BackendError>,
) -> BackendOutcome {
    match result {
        Ok(detail) => BackendOutcome::success(name, detail),
        Err(err) => {
            tracing::warn!(backend = name, error = %err, "backend call failed");
            BackendOutcome {
                backend: name.to_string(),
                status: err.status(),
                detail: serde_json::Value::String(err.to_string()),
            }
        }
    }
}

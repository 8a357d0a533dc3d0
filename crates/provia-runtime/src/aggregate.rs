//! Result aggregation.
//!
//! Merges the heterogeneous pieces of one orchestration attempt (policy
//! decision, advisory result, per-backend outcomes) into one
//! `ProvisioningResult`. Backend outcomes keep the configured adapter
//! order so the same request shape always produces an identically-ordered
//! result, regardless of completion order.

use provia_core::{
    AdvisoryResult, BackendOutcome, PolicyDecision, ProvisioningOperation, ProvisioningResult,
    UserProfile,
};

/// Assemble the aggregate result for a completed attempt.
pub fn assemble(
    operation: ProvisioningOperation,
    profile: &UserProfile,
    policy_check: Option<PolicyDecision>,
    ai_access: Option<AdvisoryResult>,
    backends: Vec<BackendOutcome>,
) -> ProvisioningResult {
    ProvisioningResult {
        operation,
        subject: profile.email.clone(),
        policy_check,
        ai_access,
        backends,
    }
}

//! Error types for the policy crate.

use thiserror::Error;

/// Errors from a policy gate evaluation.
///
/// The orchestrator converts any of these into a fail-closed deny; an
/// evaluation error is never allowed to surface as an allow.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Transport-level failure reaching the policy service.
    #[error("policy service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The policy service answered with a non-success status.
    #[error("policy service returned status {status}")]
    UnexpectedStatus { status: u16 },

    /// The policy service answered with a body we could not interpret.
    #[error("malformed policy response: {0}")]
    MalformedResponse(String),

    /// The gate client itself is misconfigured.
    #[error("invalid policy configuration: {0}")]
    InvalidConfiguration(String),
}

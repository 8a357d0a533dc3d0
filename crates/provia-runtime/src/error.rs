//! Orchestrator error types.

use thiserror::Error;

use provia_core::ProfileError;

/// Errors that abort an orchestration before it is accepted.
///
/// This is deliberately narrow: once a request is accepted, every failure
/// mode (deny, partial backend failure, advisory failure) completes the
/// workflow and is reported inside the `ProvisioningResult` instead.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The request is structurally invalid. Rejected before any
    /// collaborator call and before any audit record is written.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ProfileError),
}

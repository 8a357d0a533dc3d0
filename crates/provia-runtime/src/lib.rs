//! Orchestration runtime for provia.
//!
//! Ties the policy gate, advisory recommender, backend adapters, and
//! audit trail together into a single workflow. The server crate builds
//! one [`Orchestrator`] at startup and shares it across requests.

pub mod aggregate;
pub mod error;
pub mod orchestrator;

pub use error::OrchestratorError;
pub use orchestrator::{Orchestrator, POLICY_FAILED_REASON};

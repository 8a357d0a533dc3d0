//! Backend adapter error types.
//!
//! Errors are classified into the outcome status they convert to:
//! reachability problems become `unavailable`, everything the backend
//! itself reported becomes `error`. No adapter error ever crosses the
//! orchestrator boundary as an `Err`.

use thiserror::Error;

use provia_core::BackendStatus;

/// Error that can occur inside one backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Token acquisition or credential resolution failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The backend has no record for the subject.
    #[error("user not found: {0}")]
    NotFound(String),

    /// The backend answered with a body we could not interpret.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// The outcome status this error converts to.
    ///
    /// A backend we could not reach at all is `unavailable`; a backend that
    /// answered (even badly) or timed out mid-call is `error`.
    pub fn status(&self) -> BackendStatus {
        match self {
            Self::Http(e) if e.is_connect() => BackendStatus::Unavailable,
            _ => BackendStatus::Error,
        }
    }
}

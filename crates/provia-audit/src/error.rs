//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur during audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to initialize the audit trail.
    #[error("failed to initialize audit trail: {0}")]
    InitializationFailed(String),

    /// Failed to append a record.
    #[error("failed to append audit record: {0}")]
    AppendFailed(String),

    /// Failed to read records back.
    #[error("failed to read audit records: {0}")]
    ReadFailed(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use provia_runtime::OrchestratorError;

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("audit trail unavailable: {0}")]
    Audit(#[from] provia_audit::AuditError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Orchestrator(OrchestratorError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

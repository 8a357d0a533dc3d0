//! Request handlers.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use provia_core::{ProvisioningOperation, ProvisioningResult, UserProfile};

use crate::dashboard;
use crate::error::ServerError;
use crate::state::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "provia" }))
}

pub async fn provision_user(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<ProvisioningResult>, ServerError> {
    execute(&state, ProvisioningOperation::Create, profile).await
}

pub async fn update_user(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<ProvisioningResult>, ServerError> {
    execute(&state, ProvisioningOperation::Update, profile).await
}

pub async fn deprovision_user(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<ProvisioningResult>, ServerError> {
    execute(&state, ProvisioningOperation::Delete, profile).await
}

async fn execute(
    state: &AppState,
    operation: ProvisioningOperation,
    profile: UserProfile,
) -> Result<Json<ProvisioningResult>, ServerError> {
    let result = state.orchestrator().execute(operation, profile).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Case-insensitive substring filter over rendered records.
    pub q: Option<String>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, ServerError> {
    let page_size = state.config().dashboard.page_size;
    let mut records = state.audit().recent(page_size).await?;

    if let Some(needle) = query.q.as_deref().filter(|q| !q.is_empty()) {
        records.retain(|record| record.matches(needle));
    }

    Ok(Html(dashboard::render(&records, query.q.as_deref())))
}

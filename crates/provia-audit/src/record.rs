//! Audit record types.
//!
//! One record summarizes one completed orchestration attempt, including
//! policy-denied attempts. Records are line-oriented JSON on disk and
//! carry an explicit schema version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use provia_core::{BackendStatus, ProvisioningOperation, ProvisioningResult};

/// Current record schema version.
pub const AUDIT_SCHEMA_VERSION: &str = "1";

/// Per-backend status summary inside a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSummary {
    pub backend: String,
    pub status: BackendStatus,
}

/// One audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record id.
    pub record_id: Uuid,

    /// Record schema version.
    pub schema_version: String,

    /// When the attempt completed.
    pub occurred_at: DateTime<Utc>,

    pub operation: ProvisioningOperation,

    /// Subject email.
    pub subject: String,

    /// Policy decision, when the operation was gated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,

    /// Policy reason, when one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Per-backend statuses in reporting order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backends: Vec<BackendSummary>,

    /// Advisory error, when the advisory step ran and failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory_error: Option<String>,
}

impl AuditRecord {
    /// Summarize a completed orchestration attempt.
    pub fn for_result(result: &ProvisioningResult) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            schema_version: AUDIT_SCHEMA_VERSION.to_string(),
            occurred_at: Utc::now(),
            operation: result.operation,
            subject: result.subject.clone(),
            allowed: result.policy_check.as_ref().map(|d| d.allow),
            reason: result.policy_check.as_ref().and_then(|d| d.reason.clone()),
            backends: result
                .backends
                .iter()
                .map(|o| BackendSummary {
                    backend: o.backend.clone(),
                    status: o.status,
                })
                .collect(),
            advisory_error: result.ai_access.as_ref().and_then(|a| a.error.clone()),
        }
    }

    /// Format the record as a human-readable log line.
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} subject={}",
            self.occurred_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.operation.to_string().to_uppercase(),
            self.subject,
        );

        if let Some(allowed) = self.allowed {
            line.push_str(&format!(" allowed={allowed}"));
        }
        if let Some(reason) = &self.reason {
            line.push_str(&format!(" reason=\"{}\"", reason.replace('"', "'")));
        }
        for summary in &self.backends {
            line.push_str(&format!(" {}={}", summary.backend, summary.status));
        }
        if self.advisory_error.is_some() {
            line.push_str(" advisory=error");
        }

        line
    }

    /// Case-insensitive substring match used by the dashboard search box.
    pub fn matches(&self, needle: &str) -> bool {
        self.to_log_line()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

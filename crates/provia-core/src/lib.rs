use serde::{Deserialize, Serialize};

// Configuration types shared across all Provia crates
pub mod config;

pub use config::{
    AdvisoryConfig,
    AuditConfig,
    BackendsConfig,
    CloudIamConfig,
    DashboardConfig,
    DirectoryConfig,
    GovernanceConfig,
    PolicyConfig,
    PolicyMode,
    ProviaConfig,
    ServerConfig,
};

/// Identity attributes carried through a provisioning workflow.
///
/// The email address is the unique subject key; everything else is optional.
/// A profile is immutable once a request has been accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl UserProfile {
    /// Create a minimal profile with just the subject email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            job_title: None,
            department: None,
            location: None,
            employee_id: None,
            manager_id: None,
            cost_center: None,
            region: None,
        }
    }

    /// Validate the unique subject key.
    ///
    /// The email must contain exactly one `@` with a non-empty local part
    /// and a non-empty domain. Requests failing this check are rejected
    /// before any collaborator is called.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ProfileError::MissingEmail);
        }
        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.') =>
            {
                Ok(())
            }
            _ => Err(ProfileError::MalformedEmail(email.to_string())),
        }
    }

    /// External identifier used by backends that want a stable id.
    ///
    /// Falls back to the email when no employee id was supplied.
    pub fn external_id(&self) -> &str {
        self.employee_id.as_deref().unwrap_or(&self.email)
    }
}

/// Structural errors in an inbound profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("email is required")]
    MissingEmail,

    #[error("malformed email address: {0}")]
    MalformedEmail(String),
}

/// The three lifecycle operations the orchestrator supports.
///
/// `Create` alone runs the policy gate and the advisory recommender;
/// `Update` and `Delete` go straight to the backend fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningOperation {
    Create,
    Update,
    Delete,
}

impl ProvisioningOperation {
    /// Whether this operation is gated by policy and advisory stages.
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::Create)
    }
}

impl std::fmt::Display for ProvisioningOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Result of a policy gate evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub allow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PolicyDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            allow: true,
            reason: Some(reason.into()),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allow: false,
            reason: Some(reason.into()),
        }
    }
}

/// Best-effort entitlement suggestion for a profile.
///
/// Always carries either a suggestion or a captured error; the advisory
/// stage never fails the surrounding workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdvisoryResult {
    pub fn entitlements(entitlements: impl Into<String>) -> Self {
        Self {
            entitlements: Some(entitlements.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            entitlements: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Status of one backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    /// The backend accepted the operation.
    Success,
    /// The backend was reached but the call failed (including timeouts).
    Error,
    /// The adapter is not configured or its dependency cannot be reached.
    Unavailable,
}

impl std::fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Outcome of one backend call within one orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendOutcome {
    /// Configured backend name, e.g. "directory".
    pub backend: String,
    pub status: BackendStatus,
    /// Opaque backend payload on success, error message otherwise.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub detail: serde_json::Value,
}

impl BackendOutcome {
    pub fn success(backend: impl Into<String>, detail: serde_json::Value) -> Self {
        Self {
            backend: backend.into(),
            status: BackendStatus::Success,
            detail,
        }
    }

    pub fn error(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            status: BackendStatus::Error,
            detail: serde_json::Value::String(message.into()),
        }
    }

    pub fn unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            status: BackendStatus::Unavailable,
            detail: serde_json::Value::String(message.into()),
        }
    }
}

/// Aggregate outcome of one orchestration attempt.
///
/// This is both the caller-visible response body and the unit summarized
/// into the audit trail. `backends` is ordered by adapter configuration
/// order, never by completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningResult {
    pub operation: ProvisioningOperation,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_check: Option<PolicyDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_access: Option<AdvisoryResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backends: Vec<BackendOutcome>,
}

impl ProvisioningResult {
    /// A result that carries only a (denying) policy decision.
    pub fn denied(
        operation: ProvisioningOperation,
        subject: impl Into<String>,
        decision: PolicyDecision,
    ) -> Self {
        Self {
            operation,
            subject: subject.into(),
            policy_check: Some(decision),
            ai_access: None,
            backends: Vec::new(),
        }
    }

    /// Whether the request was stopped by the policy gate.
    pub fn is_denied(&self) -> bool {
        matches!(&self.policy_check, Some(d) if !d.allow)
    }

    /// Look up one backend's outcome by configured name.
    pub fn backend(&self, name: &str) -> Option<&BackendOutcome> {
        self.backends.iter().find(|o| o.backend == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_roundtrips_camel_case() {
        let json = serde_json::json!({
            "email": "ada@example.com",
            "displayName": "Ada Lovelace",
            "jobTitle": "Engineer",
            "employeeId": "E-1042",
            "costCenter": "cc-7",
        });
        let profile: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile.external_id(), "E-1042");

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["jobTitle"], "Engineer");
        assert!(back.get("managerId").is_none());
    }

    #[test]
    fn profile_validation_rejects_bad_emails() {
        assert!(UserProfile::new("ada@example.com").validate().is_ok());
        assert!(matches!(
            UserProfile::new("").validate(),
            Err(ProfileError::MissingEmail)
        ));
        assert!(matches!(
            UserProfile::new("no-at-sign").validate(),
            Err(ProfileError::MalformedEmail(_))
        ));
        assert!(UserProfile::new("@example.com").validate().is_err());
        assert!(UserProfile::new("ada@").validate().is_err());
        assert!(UserProfile::new("ada@nodot").validate().is_err());
    }

    #[test]
    fn external_id_falls_back_to_email() {
        let profile = UserProfile::new("ada@example.com");
        assert_eq!(profile.external_id(), "ada@example.com");
    }

    #[test]
    fn denied_result_has_no_backend_outcomes() {
        let result = ProvisioningResult::denied(
            ProvisioningOperation::Create,
            "ada@example.com",
            PolicyDecision::deny("region blocked"),
        );
        assert!(result.is_denied());
        assert!(result.backends.is_empty());
        assert!(result.ai_access.is_none());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["policy_check"]["reason"], "region blocked");
        assert!(json.get("backends").is_none());
    }

    #[test]
    fn operation_gating() {
        assert!(ProvisioningOperation::Create.is_gated());
        assert!(!ProvisioningOperation::Update.is_gated());
        assert!(!ProvisioningOperation::Delete.is_gated());
        assert_eq!(ProvisioningOperation::Delete.to_string(), "delete");
    }
}

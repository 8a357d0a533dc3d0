//! The provisioning orchestrator.
//!
//! Sequences one orchestration attempt end-to-end: validation, policy
//! gate (Create only, fail-closed), advisory recommendation (Create only,
//! best-effort, concurrent with the fan-out), concurrent backend fan-out
//! with per-call timeouts, aggregation, and exactly one audit record per
//! accepted request.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use provia_advisory::Recommender;
use provia_audit::{AuditLog, AuditRecord};
use provia_backends::BackendAdapter;
use provia_core::{
    AdvisoryResult, BackendOutcome, PolicyDecision, ProvisioningOperation, ProvisioningResult,
    UserProfile,
};
use provia_policy::PolicyGate;

use crate::aggregate;
use crate::error::OrchestratorError;

/// Reason attached to the fail-closed deny when the gate cannot answer.
pub const POLICY_FAILED_REASON: &str = "policy check failed";

pub struct Orchestrator {
    policy: Arc<dyn PolicyGate>,
    recommender: Arc<dyn Recommender>,
    adapters: Vec<Arc<dyn BackendAdapter>>,
    audit: AuditLog,
    call_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        policy: Arc<dyn PolicyGate>,
        recommender: Arc<dyn Recommender>,
        adapters: Vec<Arc<dyn BackendAdapter>>,
        audit: AuditLog,
        call_timeout: Duration,
    ) -> Self {
        Self {
            policy,
            recommender,
            adapters,
            audit,
            call_timeout,
        }
    }

    /// Run one orchestration attempt.
    ///
    /// Only structurally invalid input returns `Err`; every accepted
    /// request completes, is audited, and yields a `ProvisioningResult`
    /// describing what happened per backend.
    pub async fn execute(
        &self,
        operation: ProvisioningOperation,
        profile: UserProfile,
    ) -> Result<ProvisioningResult, OrchestratorError> {
        profile.validate()?;

        tracing::info!(
            operation = %operation,
            subject = %profile.email,
            "orchestration accepted"
        );

        let result = if operation.is_gated() {
            self.execute_gated(operation, &profile).await
        } else {
            let outcomes = self.fan_out(operation, &profile).await;
            aggregate::assemble(operation, &profile, None, None, outcomes)
        };

        self.write_audit(&result).await;
        Ok(result)
    }

    async fn execute_gated(
        &self,
        operation: ProvisioningOperation,
        profile: &UserProfile,
    ) -> ProvisioningResult {
        // Policy strictly precedes the fan-out. An unanswerable gate is a
        // deny, never an allow.
        let decision = match self.policy.evaluate(profile).await {
            Ok(decision) => decision,
            Err(err) => {
                tracing::warn!(
                    subject = %profile.email,
                    error = %err,
                    "policy gate unreachable, denying"
                );
                PolicyDecision::deny(POLICY_FAILED_REASON)
            }
        };

        if !decision.allow {
            tracing::warn!(
                subject = %profile.email,
                reason = decision.reason.as_deref().unwrap_or("unspecified"),
                "provisioning denied by policy"
            );
            return ProvisioningResult::denied(operation, &profile.email, decision);
        }

        // Advisory and fan-out are independent: both start now, neither
        // waits for or cancels the other.
        let (advisory, outcomes) =
            tokio::join!(self.advise(profile), self.fan_out(operation, profile));

        aggregate::assemble(operation, profile, Some(decision), Some(advisory), outcomes)
    }

    async fn advise(&self, profile: &UserProfile) -> AdvisoryResult {
        match tokio::time::timeout(self.call_timeout, self.recommender.recommend(profile)).await {
            Ok(result) => result,
            Err(_) => AdvisoryResult::error(format!(
                "advisory timed out after {}s",
                self.call_timeout.as_secs()
            )),
        }
    }

    /// Scatter-gather over all configured adapters.
    ///
    /// Calls run concurrently with independent timeouts; one adapter's
    /// failure or timeout never cancels its siblings. Outcomes come back
    /// in adapter configuration order.
    async fn fan_out(
        &self,
        operation: ProvisioningOperation,
        profile: &UserProfile,
    ) -> Vec<BackendOutcome> {
        let calls = self.adapters.iter().map(|adapter| {
            let adapter = adapter.clone();
            async move {
                let name = adapter.name().to_string();
                let call = async {
                    match operation {
                        ProvisioningOperation::Create => adapter.create_user(profile).await,
                        ProvisioningOperation::Update => adapter.update_user(profile).await,
                        ProvisioningOperation::Delete => adapter.delete_user(profile).await,
                    }
                };
                match tokio::time::timeout(self.call_timeout, call).await {
                    Ok(outcome) => outcome,
                    Err(_) => BackendOutcome::error(
                        name,
                        format!("timed out after {}s", self.call_timeout.as_secs()),
                    ),
                }
            }
        });

        join_all(calls).await
    }

    async fn write_audit(&self, result: &ProvisioningResult) {
        // Audit failures never turn a completed orchestration into a
        // caller-visible failure.
        if let Err(err) = self.audit.record(AuditRecord::for_result(result)).await {
            tracing::error!(
                subject = %result.subject,
                error = %err,
                "failed to write audit record"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use provia_core::{BackendStatus, ProfileError};
    use provia_policy::PolicyError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ----- mock collaborators -----

    struct ScriptedGate {
        decision: PolicyDecision,
        calls: AtomicUsize,
    }

    impl ScriptedGate {
        fn allowing() -> Arc<Self> {
            Arc::new(Self {
                decision: PolicyDecision {
                    allow: true,
                    reason: None,
                },
                calls: AtomicUsize::new(0),
            })
        }

        fn denying(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                decision: PolicyDecision::deny(reason),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PolicyGate for ScriptedGate {
        async fn evaluate(&self, _profile: &UserProfile) -> Result<PolicyDecision, PolicyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.decision.clone())
        }
    }

    struct ErringGate;

    #[async_trait]
    impl PolicyGate for ErringGate {
        async fn evaluate(&self, _profile: &UserProfile) -> Result<PolicyDecision, PolicyError> {
            Err(PolicyError::MalformedResponse("connection reset".to_string()))
        }
    }

    struct FixedRecommender {
        result: AdvisoryResult,
    }

    impl FixedRecommender {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                result: AdvisoryResult::entitlements("{\"groups\": [\"eng-all\"]}"),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                result: AdvisoryResult::error("model unavailable"),
            })
        }
    }

    #[async_trait]
    impl Recommender for FixedRecommender {
        async fn recommend(&self, _profile: &UserProfile) -> AdvisoryResult {
            self.result.clone()
        }
    }

    struct SlowRecommender;

    #[async_trait]
    impl Recommender for SlowRecommender {
        async fn recommend(&self, _profile: &UserProfile) -> AdvisoryResult {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            AdvisoryResult::entitlements("too late")
        }
    }

    enum Behavior {
        Succeed,
        Fail(&'static str),
        Hang,
    }

    struct MockAdapter {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl MockAdapter {
        fn ok(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior: Behavior::Succeed,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str, message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior: Behavior::Fail(message),
                calls: AtomicUsize::new(0),
            })
        }

        fn hanging(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior: Behavior::Hang,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn respond(&self) -> BackendOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => {
                    BackendOutcome::success(self.name, serde_json::json!({"id": "x"}))
                }
                Behavior::Fail(message) => BackendOutcome::error(self.name, message),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    BackendOutcome::success(self.name, serde_json::json!({}))
                }
            }
        }
    }

    #[async_trait]
    impl BackendAdapter for MockAdapter {
        fn name(&self) -> &str {
            self.name
        }

        async fn create_user(&self, _profile: &UserProfile) -> BackendOutcome {
            self.respond().await
        }

        async fn update_user(&self, _profile: &UserProfile) -> BackendOutcome {
            self.respond().await
        }

        async fn delete_user(&self, _profile: &UserProfile) -> BackendOutcome {
            self.respond().await
        }
    }

    fn orchestrator(
        policy: Arc<dyn PolicyGate>,
        recommender: Arc<dyn Recommender>,
        adapters: Vec<Arc<dyn BackendAdapter>>,
        audit: AuditLog,
    ) -> Orchestrator {
        Orchestrator::new(policy, recommender, adapters, audit, Duration::from_secs(5))
    }

    fn profile() -> UserProfile {
        UserProfile::new("ada@example.com")
    }

    // ----- properties -----

    #[tokio::test]
    async fn denied_create_never_touches_backends() {
        let gate = ScriptedGate::denying("region blocked");
        let directory = MockAdapter::ok("directory");
        let cloud = MockAdapter::ok("cloud_iam");
        let audit = AuditLog::in_memory();

        let orch = orchestrator(
            gate.clone(),
            FixedRecommender::ok(),
            vec![directory.clone(), cloud.clone()],
            audit.clone(),
        );
        let result = orch
            .execute(ProvisioningOperation::Create, profile())
            .await
            .unwrap();

        assert!(result.is_denied());
        assert!(result.backends.is_empty());
        assert!(result.ai_access.is_none());
        assert_eq!(directory.call_count(), 0);
        assert_eq!(cloud.call_count(), 0);

        let records = audit.recent(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].allowed, Some(false));
        assert_eq!(records[0].reason.as_deref(), Some("region blocked"));
    }

    #[tokio::test]
    async fn erroring_gate_fails_closed() {
        let directory = MockAdapter::ok("directory");
        let audit = AuditLog::in_memory();

        let orch = orchestrator(
            Arc::new(ErringGate),
            FixedRecommender::ok(),
            vec![directory.clone()],
            audit.clone(),
        );
        let result = orch
            .execute(ProvisioningOperation::Create, profile())
            .await
            .unwrap();

        assert!(result.is_denied());
        assert_eq!(
            result.policy_check.unwrap().reason.as_deref(),
            Some(POLICY_FAILED_REASON)
        );
        assert_eq!(directory.call_count(), 0);
        assert_eq!(audit.recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn one_failing_backend_leaves_siblings_intact() {
        let orch = orchestrator(
            ScriptedGate::allowing(),
            FixedRecommender::ok(),
            vec![
                MockAdapter::ok("directory"),
                MockAdapter::failing("cloud_iam", "internal error"),
                MockAdapter::ok("governance"),
            ],
            AuditLog::in_memory(),
        );
        let result = orch
            .execute(ProvisioningOperation::Create, profile())
            .await
            .unwrap();

        assert_eq!(result.backends.len(), 3);
        assert_eq!(
            result.backend("directory").unwrap().status,
            BackendStatus::Success
        );
        assert_eq!(
            result.backend("cloud_iam").unwrap().status,
            BackendStatus::Error
        );
        assert_eq!(
            result.backend("governance").unwrap().status,
            BackendStatus::Success
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_backend_does_not_cancel_siblings() {
        let audit = AuditLog::in_memory();
        let orch = orchestrator(
            ScriptedGate::allowing(),
            FixedRecommender::ok(),
            vec![
                MockAdapter::ok("directory"),
                MockAdapter::hanging("cloud_iam"),
                MockAdapter::ok("governance"),
            ],
            audit.clone(),
        );
        let result = orch
            .execute(ProvisioningOperation::Create, profile())
            .await
            .unwrap();

        assert_eq!(result.backends.len(), 3);
        let cloud = result.backend("cloud_iam").unwrap();
        assert_eq!(cloud.status, BackendStatus::Error);
        assert!(cloud.detail.as_str().unwrap().contains("timed out"));
        assert_eq!(
            result.backend("directory").unwrap().status,
            BackendStatus::Success
        );
        assert_eq!(
            result.backend("governance").unwrap().status,
            BackendStatus::Success
        );
        assert!(result.ai_access.is_some());
        assert_eq!(audit.recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn advisory_failure_changes_no_backend_outcome() {
        let orch = orchestrator(
            ScriptedGate::allowing(),
            FixedRecommender::failing(),
            vec![MockAdapter::ok("directory"), MockAdapter::ok("governance")],
            AuditLog::in_memory(),
        );
        let result = orch
            .execute(ProvisioningOperation::Create, profile())
            .await
            .unwrap();

        assert_eq!(
            result.ai_access.as_ref().unwrap().error.as_deref(),
            Some("model unavailable")
        );
        assert_eq!(result.backends.len(), 2);
        assert!(result
            .backends
            .iter()
            .all(|o| o.status == BackendStatus::Success));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_advisory_times_out_without_blocking_backends() {
        let orch = orchestrator(
            ScriptedGate::allowing(),
            Arc::new(SlowRecommender),
            vec![MockAdapter::ok("directory")],
            AuditLog::in_memory(),
        );
        let result = orch
            .execute(ProvisioningOperation::Create, profile())
            .await
            .unwrap();

        assert_eq!(
            result.backend("directory").unwrap().status,
            BackendStatus::Success
        );
        let advisory = result.ai_access.unwrap();
        assert!(advisory.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn invalid_input_writes_no_audit_record() {
        let directory = MockAdapter::ok("directory");
        let audit = AuditLog::in_memory();
        let orch = orchestrator(
            ScriptedGate::allowing(),
            FixedRecommender::ok(),
            vec![directory.clone()],
            audit.clone(),
        );

        let err = orch
            .execute(ProvisioningOperation::Create, UserProfile::new("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::InvalidInput(ProfileError::MalformedEmail(_))
        ));
        assert_eq!(directory.call_count(), 0);
        assert!(audit.recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn every_accepted_operation_writes_exactly_one_record() {
        let audit = AuditLog::in_memory();
        let orch = orchestrator(
            ScriptedGate::allowing(),
            FixedRecommender::ok(),
            vec![MockAdapter::failing("directory", "down")],
            audit.clone(),
        );

        for op in [
            ProvisioningOperation::Create,
            ProvisioningOperation::Update,
            ProvisioningOperation::Delete,
        ] {
            orch.execute(op, profile()).await.unwrap();
        }

        assert_eq!(audit.recent(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_and_delete_skip_gate_and_advisory() {
        let gate = ScriptedGate::denying("would deny if asked");
        let orch = orchestrator(
            gate.clone(),
            FixedRecommender::ok(),
            vec![MockAdapter::ok("directory")],
            AuditLog::in_memory(),
        );

        for op in [ProvisioningOperation::Update, ProvisioningOperation::Delete] {
            let result = orch.execute(op, profile()).await.unwrap();
            assert!(result.policy_check.is_none());
            assert!(result.ai_access.is_none());
            assert_eq!(result.backends.len(), 1);
        }
        assert_eq!(gate.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn outcome_order_is_stable_across_repeated_requests() {
        let orch = orchestrator(
            ScriptedGate::allowing(),
            FixedRecommender::ok(),
            vec![
                MockAdapter::ok("directory"),
                MockAdapter::failing("cloud_iam", "flaky"),
                MockAdapter::ok("governance"),
            ],
            AuditLog::in_memory(),
        );

        let mut shapes = Vec::new();
        for _ in 0..5 {
            let result = orch
                .execute(ProvisioningOperation::Create, profile())
                .await
                .unwrap();
            let names: Vec<String> =
                result.backends.iter().map(|o| o.backend.clone()).collect();
            shapes.push(names);
        }
        assert!(shapes.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(shapes[0], vec!["directory", "cloud_iam", "governance"]);
    }

    #[tokio::test]
    async fn delete_of_unknown_subject_fails_per_backend_independently() {
        let orch = orchestrator(
            ScriptedGate::allowing(),
            FixedRecommender::ok(),
            vec![
                MockAdapter::failing("directory", "user not found: ghost@example.com"),
                MockAdapter::failing("cloud_iam", "user not found: ghost@example.com"),
                MockAdapter::failing("governance", "user not found: ghost@example.com"),
            ],
            AuditLog::in_memory(),
        );
        let result = orch
            .execute(
                ProvisioningOperation::Delete,
                UserProfile::new("ghost@example.com"),
            )
            .await
            .unwrap();

        assert_eq!(result.backends.len(), 3);
        for outcome in &result.backends {
            assert_eq!(outcome.status, BackendStatus::Error);
            assert!(outcome.detail.as_str().unwrap().contains("not found"));
        }
    }

    #[tokio::test]
    async fn audit_failure_does_not_fail_the_request() {
        struct BrokenStorage;

        #[async_trait]
        impl provia_audit::AuditStorage for BrokenStorage {
            async fn append(
                &self,
                _record: provia_audit::AuditRecord,
            ) -> Result<(), provia_audit::AuditError> {
                Err(provia_audit::AuditError::AppendFailed("disk full".to_string()))
            }

            async fn recent(
                &self,
                _limit: usize,
            ) -> Result<Vec<provia_audit::AuditRecord>, provia_audit::AuditError> {
                Ok(Vec::new())
            }
        }

        let orch = orchestrator(
            ScriptedGate::allowing(),
            FixedRecommender::ok(),
            vec![MockAdapter::ok("directory")],
            AuditLog::with_storage(Arc::new(BrokenStorage)),
        );
        let result = orch
            .execute(ProvisioningOperation::Create, profile())
            .await
            .unwrap();
        assert_eq!(
            result.backend("directory").unwrap().status,
            BackendStatus::Success
        );
    }
}

//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use provia_advisory::{DisabledRecommender, OpenAiRecommender, Recommender};
use provia_audit::AuditLog;
use provia_backends::build_adapters;
use provia_core::{PolicyMode, ProviaConfig};
use provia_policy::{HttpPolicyGate, PolicyError, PolicyGate, StaticGate};
use provia_runtime::Orchestrator;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    orchestrator: Orchestrator,
    audit: AuditLog,
    config: ProviaConfig,
}

impl AppState {
    /// Wire up the orchestrator and its collaborators from configuration.
    pub fn from_config(config: ProviaConfig) -> Result<Self, PolicyError> {
        let call_timeout = Duration::from_secs(config.call_timeout_secs);

        let policy: Arc<dyn PolicyGate> = match config.policy.mode {
            PolicyMode::Enabled => {
                tracing::info!(url = %config.policy.url, "policy gate enabled");
                Arc::new(HttpPolicyGate::new(&config.policy)?)
            }
            PolicyMode::Disabled => {
                tracing::warn!("policy gate disabled by configuration, all requests allowed");
                Arc::new(StaticGate::allow_all())
            }
        };

        let recommender: Arc<dyn Recommender> = match OpenAiRecommender::from_config(
            &config.advisory,
        ) {
            Some(recommender) => {
                tracing::info!(model = %config.advisory.model, "advisory recommender enabled");
                Arc::new(recommender)
            }
            None => {
                tracing::info!("advisory recommender disabled");
                Arc::new(DisabledRecommender::new("advisory recommender disabled"))
            }
        };

        let adapters = build_adapters(&config.backends, call_timeout);
        let audit = AuditLog::new(&config.audit);

        let orchestrator = Orchestrator::new(
            policy,
            recommender,
            adapters,
            audit.clone(),
            call_timeout,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                orchestrator,
                audit,
                config,
            }),
        })
    }

    /// Build state from already-constructed collaborators. Used by tests.
    pub fn with_parts(config: ProviaConfig, orchestrator: Orchestrator, audit: AuditLog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                orchestrator,
                audit,
                config,
            }),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.inner.orchestrator
    }

    pub fn audit(&self) -> &AuditLog {
        &self.inner.audit
    }

    pub fn config(&self) -> &ProviaConfig {
        &self.inner.config
    }
}

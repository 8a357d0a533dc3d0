//! # provia-backends
//!
//! Adapters over the external identity systems Provia provisions into:
//!
//! - **directory**: Entra-style Graph API (client-credentials grant)
//! - **cloud_iam**: SCIM 2.0 provisioning endpoint (bearer token)
//! - **governance**: SailPoint-style v3 user API (bearer token)
//!
//! Every adapter implements the [`BackendAdapter`] capability set
//! `{create_user, update_user, delete_user}` and converts all internal
//! failures into a [`provia_core::BackendOutcome`] at the boundary. A
//! backend with no configuration (or unresolvable credentials) is
//! installed as an [`InertAdapter`] that reports `unavailable`.

pub mod cloud;
pub mod directory;
pub mod error;
pub mod governance;
pub mod inert;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use provia_core::BackendsConfig;

pub use cloud::{CloudIamAdapter, CLOUD_BACKEND};
pub use directory::{DirectoryAdapter, DIRECTORY_BACKEND};
pub use error::BackendError;
pub use governance::{GovernanceAdapter, GOVERNANCE_BACKEND};
pub use inert::InertAdapter;
pub use traits::BackendAdapter;

/// Build the fan-out set from configuration.
///
/// The returned order is the fixed reporting order for aggregated results:
/// directory, cloud_iam, governance. Each missing or credential-less
/// backend becomes an inert adapter in the same slot.
pub fn build_adapters(
    config: &BackendsConfig,
    call_timeout: Duration,
) -> Vec<Arc<dyn BackendAdapter>> {
    let directory: Arc<dyn BackendAdapter> = match &config.directory {
        Some(cfg) => match DirectoryAdapter::from_config(cfg, call_timeout) {
            Some(adapter) => Arc::new(adapter),
            None => inert(DIRECTORY_BACKEND, "client secret not resolvable"),
        },
        None => inert(DIRECTORY_BACKEND, "backend not configured"),
    };

    let cloud: Arc<dyn BackendAdapter> = match &config.cloud {
        Some(cfg) => match CloudIamAdapter::from_config(cfg, call_timeout) {
            Some(adapter) => Arc::new(adapter),
            None => inert(CLOUD_BACKEND, "bearer token not resolvable"),
        },
        None => inert(CLOUD_BACKEND, "backend not configured"),
    };

    let governance: Arc<dyn BackendAdapter> = match &config.governance {
        Some(cfg) => match GovernanceAdapter::from_config(cfg, call_timeout) {
            Some(adapter) => Arc::new(adapter),
            None => inert(GOVERNANCE_BACKEND, "API token not resolvable"),
        },
        None => inert(GOVERNANCE_BACKEND, "backend not configured"),
    };

    vec![directory, cloud, governance]
}

fn inert(name: &str, message: &str) -> Arc<dyn BackendAdapter> {
    tracing::warn!(backend = name, reason = message, "installing inert adapter");
    Arc::new(InertAdapter::new(name, message))
}

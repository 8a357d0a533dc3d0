//! # provia-audit
//!
//! Append-only audit trail for provisioning attempts.
//!
//! Every accepted orchestration attempt, including policy-denied ones,
//! produces exactly one [`AuditRecord`]. Records for one subject appear in
//! acceptance order; records from concurrent requests for different
//! subjects may interleave.
//!
//! - **File output**: JSON Lines, one record per line, versioned by
//!   `schema_version`.
//! - **Stdout echo** (optional): human-readable log lines.
//!
//! ## Example
//!
//! ```rust,no_run
//! use provia_audit::{AuditLog, AuditRecord};
//! use provia_core::{AuditConfig, PolicyDecision, ProvisioningOperation, ProvisioningResult};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let log = AuditLog::new(&AuditConfig::default());
//!
//! let result = ProvisioningResult::denied(
//!     ProvisioningOperation::Create,
//!     "ada@example.com",
//!     PolicyDecision::deny("region blocked"),
//! );
//! log.record(AuditRecord::for_result(&result)).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod log;
pub mod record;
pub mod storage;

pub use error::AuditError;
pub use log::AuditLog;
pub use record::{AuditRecord, BackendSummary, AUDIT_SCHEMA_VERSION};
pub use storage::{AuditStorage, FileStorage, MemoryStorage, NullStorage};

//! The audit log front type.

use std::path::PathBuf;
use std::sync::Arc;

use provia_core::AuditConfig;

use crate::error::AuditError;
use crate::record::AuditRecord;
use crate::storage::{AuditStorage, FileStorage, MemoryStorage, NullStorage};

/// Handle to the audit trail shared by the orchestrator and the dashboard.
#[derive(Clone)]
pub struct AuditLog {
    enabled: bool,
    stdout: bool,
    storage: Arc<dyn AuditStorage>,
}

impl AuditLog {
    /// Create an audit log from configuration.
    pub fn new(config: &AuditConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let mut path = PathBuf::from(&config.directory);
        path.push("audit.log");
        Self {
            enabled: true,
            stdout: config.stdout,
            storage: Arc::new(FileStorage::new(path)),
        }
    }

    /// Create a log with a custom storage backend.
    pub fn with_storage(storage: Arc<dyn AuditStorage>) -> Self {
        Self {
            enabled: true,
            stdout: false,
            storage,
        }
    }

    /// Create a disabled (no-op) log.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            stdout: false,
            storage: Arc::new(NullStorage),
        }
    }

    /// In-memory log, used by tests.
    pub fn in_memory() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one record.
    pub async fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        if !self.enabled {
            return Ok(());
        }

        tracing::debug!(
            record_id = %record.record_id,
            operation = %record.operation,
            subject = %record.subject,
            "audit record"
        );
        if self.stdout {
            println!("{}", record.to_log_line());
        }

        self.storage.append(record).await
    }

    /// Read up to `limit` records, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError> {
        self.storage.recent(limit).await
    }
}

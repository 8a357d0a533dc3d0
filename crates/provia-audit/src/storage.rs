//! Audit storage backends.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::AuditError;
use crate::record::AuditRecord;

/// Trait for audit storage backends.
///
/// `append` must serialize concurrent writers so two records never
/// interleave partial writes, and must tolerate being the very first
/// write (no pre-existing file or directory).
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Append one record.
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError>;

    /// Read up to `limit` records, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError>;
}

/// File storage: one JSON record per line, appends serialized by a mutex.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn ensure_parent(&self) -> Result<(), AuditError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AuditStorage for FileStorage {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        let line = serde_json::to_string(&record)?;

        let _guard = self.write_lock.lock().await;
        self.ensure_parent()?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for line in raw.lines().rev() {
            if records.len() == limit {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditRecord>(line) {
                Ok(record) => records.push(record),
                // A torn or hand-edited line must not hide the rest of
                // the trail.
                Err(e) => tracing::warn!(error = %e, "skipping unparseable audit line"),
            }
        }
        Ok(records)
    }
}

/// In-memory storage for tests and disabled-persistence deployments.
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditStorage for MemoryStorage {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError> {
        let records = self.records.lock().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}

/// Discards everything. Used when audit logging is disabled.
pub struct NullStorage;

#[async_trait]
impl AuditStorage for NullStorage {
    async fn append(&self, _record: AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<AuditRecord>, AuditError> {
        Ok(Vec::new())
    }
}

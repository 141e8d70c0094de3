//! Test utilities for HRMS crates.

use async_trait::async_trait;
use hrms_audit_store::{AuditStore, MemoryAuditStore, StoreError, StoreResult};
use hrms_audit_types::{AuditLogEntry, AuditQueryFilter, NewAuditLogEntry, ValidatedEntry};
use hrms_common_core::UserId;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Path for a SQLite file inside a fresh temporary directory.
pub fn temp_db() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("audit.db");
    (dir, path)
}

/// Minimal valid entry.
pub fn entry(user: &str, action: &str, resource: &str) -> NewAuditLogEntry {
    NewAuditLogEntry::builder(user, action, resource).build()
}

/// Store whose every call fails, counting attempted appends.
#[derive(Default)]
pub struct FailingStore {
    appends: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of append calls received.
    pub fn append_attempts(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn append(&self, _entry: ValidatedEntry) -> StoreResult<AuditLogEntry> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Closed)
    }

    async fn query(&self, _filter: &AuditQueryFilter) -> StoreResult<Vec<AuditLogEntry>> {
        Err(StoreError::Closed)
    }

    async fn count(&self, _filter: &AuditQueryFilter) -> StoreResult<u64> {
        Err(StoreError::Closed)
    }

    async fn distinct_users(&self) -> StoreResult<Vec<UserId>> {
        Err(StoreError::Closed)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Err(StoreError::Closed)
    }
}

/// Memory store that sleeps before every call.
pub struct SlowStore {
    inner: MemoryAuditStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryAuditStore::new(),
            delay,
        }
    }

    /// Entries that reached the inner store.
    pub fn stored(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl AuditStore for SlowStore {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn append(&self, entry: ValidatedEntry) -> StoreResult<AuditLogEntry> {
        tokio::time::sleep(self.delay).await;
        self.inner.append(entry).await
    }

    async fn query(&self, filter: &AuditQueryFilter) -> StoreResult<Vec<AuditLogEntry>> {
        tokio::time::sleep(self.delay).await;
        self.inner.query(filter).await
    }

    async fn count(&self, filter: &AuditQueryFilter) -> StoreResult<u64> {
        tokio::time::sleep(self.delay).await;
        self.inner.count(filter).await
    }

    async fn distinct_users(&self) -> StoreResult<Vec<UserId>> {
        tokio::time::sleep(self.delay).await;
        self.inner.distinct_users().await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

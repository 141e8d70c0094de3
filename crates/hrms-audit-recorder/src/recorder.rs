//! The audit write path.

use crate::AuditSummary;
use chrono::{NaiveTime, TimeZone, Utc};
use hrms_audit_store::{AuditStore, MemoryAuditStore, SqliteAuditStore, StorePoolConfig};
use hrms_audit_types::{
    AuditAction, AuditError, AuditLogEntry, AuditQueryFilter, AuditResult, NewAuditLogEntry,
};
use hrms_common_config::{AuditConfig, StoreBackend};
use hrms_common_core::{Timestamp, UserId};
use hrms_common_log::spans::{audit_span, Timer};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn, Instrument};

/// Recorder settings.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Upper bound on one storage call.
    pub operation_timeout: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&AuditConfig> for RecorderConfig {
    fn from(config: &AuditConfig) -> Self {
        Self {
            operation_timeout: config.operation_timeout(),
        }
    }
}

/// Validates and appends audit entries; serves reads over the trail.
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
    config: RecorderConfig,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self::with_config(store, RecorderConfig::default())
    }

    pub fn with_config(store: Arc<dyn AuditStore>, config: RecorderConfig) -> Self {
        Self { store, config }
    }

    /// Recorder over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryAuditStore::new()))
    }

    /// Open the backend named in `config`.
    pub async fn from_config(config: &AuditConfig) -> AuditResult<Self> {
        let store: Arc<dyn AuditStore> = match config.backend {
            StoreBackend::Memory => Arc::new(MemoryAuditStore::new()),
            StoreBackend::Sqlite => {
                let pool = StorePoolConfig::builder()
                    .database_path(config.database_path.to_string_lossy())
                    .min_connections(config.min_connections)
                    .max_connections(config.max_connections)
                    .build()?;
                Arc::new(SqliteAuditStore::open(&pool).await?)
            }
        };
        Ok(Self::with_config(store, RecorderConfig::from(config)))
    }

    /// Name of the backing store.
    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    /// Run one store call under the configured timeout.
    async fn call<T, F>(&self, op: &'static str, fut: F) -> AuditResult<T>
    where
        F: Future<Output = hrms_audit_store::StoreResult<T>>,
    {
        let span = audit_span(op, self.store.name());
        let timer = Timer::start(op);
        let outcome = tokio::time::timeout(self.config.operation_timeout, fut.instrument(span)).await;
        timer.finish();

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!(op, error = %err, "audit store call failed");
                Err(err.into())
            }
            Err(_) => {
                warn!(op, timeout_ms = self.config.operation_timeout.as_millis() as u64, "audit store call timed out");
                Err(AuditError::unavailable(format!(
                    "{op} timed out after {}ms",
                    self.config.operation_timeout.as_millis()
                )))
            }
        }
    }

    /// Validate and append one entry.
    ///
    /// Invalid entries are rejected before the store is touched. The append
    /// is attempted exactly once.
    pub async fn record(&self, entry: NewAuditLogEntry) -> AuditResult<AuditLogEntry> {
        let validated = match entry.validate() {
            Ok(v) => v,
            Err(err) => {
                warn!(error = %err, "rejected audit entry");
                return Err(err);
            }
        };

        let stored = self.call("append", self.store.append(validated)).await?;
        debug!(
            id = %stored.id,
            user = %stored.user_id,
            action = %stored.action,
            resource = %stored.resource,
            "audit entry recorded"
        );
        Ok(stored)
    }

    /// Entries matching every criterion in `filter`, newest first.
    ///
    /// No match is an empty vector, not an error.
    pub async fn query(&self, filter: &AuditQueryFilter) -> AuditResult<Vec<AuditLogEntry>> {
        self.call("query", self.store.query(filter)).await
    }

    /// Total number of entries.
    pub async fn count_unfiltered(&self) -> AuditResult<u64> {
        self.call("count", self.store.count(&AuditQueryFilter::default()))
            .await
    }

    /// Number of entries with the given action.
    pub async fn count_by_action(&self, action: impl Into<AuditAction>) -> AuditResult<u64> {
        let filter = AuditQueryFilter::new().action(action);
        self.call("count", self.store.count(&filter)).await
    }

    /// Every actor in the trail, sorted.
    pub async fn distinct_users(&self) -> AuditResult<Vec<UserId>> {
        self.call("distinct_users", self.store.distinct_users()).await
    }

    /// Dashboard counters, all taken from one read of the trail.
    pub async fn summary(&self) -> AuditResult<AuditSummary> {
        let entries = self.query(&AuditQueryFilter::default()).await?;
        let midnight = Utc.from_utc_datetime(&Timestamp::now().date().and_time(NaiveTime::MIN));
        Ok(AuditSummary::from_entries(
            &entries,
            Timestamp::from_datetime(midnight),
        ))
    }

    pub async fn health_check(&self) -> AuditResult<()> {
        self.call("health_check", self.store.health_check()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_assigns_identity() {
        let recorder = AuditRecorder::in_memory();
        let entry = NewAuditLogEntry::builder("u1", "CREATE", "employee").build();

        let stored = recorder.record(entry).await.unwrap();
        assert_eq!(stored.id.get(), 1);
        assert_eq!(recorder.backend(), "memory");
    }

    #[tokio::test]
    async fn test_summary() {
        let recorder = AuditRecorder::in_memory();
        for (user, action) in [("u1", "DELETE"), ("u1", "CREATE"), ("u2", "DELETE")] {
            let entry = NewAuditLogEntry::builder(user, action, "employee").build();
            recorder.record(entry).await.unwrap();
        }

        let summary = recorder.summary().await.unwrap();
        assert_eq!(
            summary,
            AuditSummary {
                total: 3,
                deletes: 2,
                distinct_users: 2,
                today: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_from_config_memory() {
        let recorder = AuditRecorder::from_config(&AuditConfig::default()).await.unwrap();
        assert_eq!(recorder.backend(), "memory");
        recorder.health_check().await.unwrap();
    }
}

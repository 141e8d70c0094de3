//! Store trait definition.

use crate::StoreResult;
use async_trait::async_trait;
use hrms_audit_types::{AuditLogEntry, AuditQueryFilter, ValidatedEntry};
use hrms_common_core::UserId;
use std::cmp::Reverse;

/// Backend holding audit entries.
///
/// Implementations assign `id` and `created_at` on append such that ids
/// strictly increase and timestamps never decrease in id order. Stored
/// entries are never changed or removed.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Persist one entry and return it as stored.
    async fn append(&self, entry: ValidatedEntry) -> StoreResult<AuditLogEntry>;

    /// Entries matching `filter`, newest first.
    async fn query(&self, filter: &AuditQueryFilter) -> StoreResult<Vec<AuditLogEntry>>;

    /// Number of entries matching `filter`.
    async fn count(&self, filter: &AuditQueryFilter) -> StoreResult<u64>;

    /// Every actor that appears in the trail, sorted.
    async fn distinct_users(&self) -> StoreResult<Vec<UserId>>;

    /// Check the backend can serve requests.
    async fn health_check(&self) -> StoreResult<()>;

    /// Size statistics.
    async fn stats(&self) -> StoreResult<StoreStats> {
        let entries = self.count(&AuditQueryFilter::default()).await?;
        let users = self.distinct_users().await?.len() as u64;
        Ok(StoreStats { entries, users })
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub entries: u64,
    pub users: u64,
}

/// Order by `created_at` descending, ties by id descending.
pub fn sort_newest_first(entries: &mut [AuditLogEntry]) {
    entries.sort_by_key(|e| Reverse((e.created_at, e.id)));
}

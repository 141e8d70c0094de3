//! In-memory store implementation.

use crate::store::{sort_newest_first, AuditStore};
use crate::StoreResult;
use async_trait::async_trait;
use hrms_audit_types::{AuditEntryId, AuditLogEntry, AuditQueryFilter, ValidatedEntry};
use hrms_common_core::{Timestamp, UserId};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use tracing::trace;

/// In-memory, append-only store.
///
/// Ids and timestamps are assigned under the write lock, so id order and
/// timestamp order agree even when the wall clock steps backwards.
#[derive(Default)]
pub struct MemoryAuditStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: Vec<AuditLogEntry>,
    last_id: i64,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, entry: ValidatedEntry) -> StoreResult<AuditLogEntry> {
        let mut inner = self.inner.write();

        let now = Timestamp::now();
        let created_at = match inner.entries.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };
        inner.last_id += 1;
        let stored = entry.into_entry(AuditEntryId::new(inner.last_id), created_at);
        inner.entries.push(stored.clone());

        trace!(id = %stored.id, "appended audit entry");
        Ok(stored)
    }

    async fn query(&self, filter: &AuditQueryFilter) -> StoreResult<Vec<AuditLogEntry>> {
        let mut found: Vec<AuditLogEntry> = self
            .inner
            .read()
            .entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        sort_newest_first(&mut found);
        Ok(found)
    }

    async fn count(&self, filter: &AuditQueryFilter) -> StoreResult<u64> {
        let inner = self.inner.read();
        if filter.is_empty() {
            return Ok(inner.entries.len() as u64);
        }
        Ok(inner.entries.iter().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn distinct_users(&self) -> StoreResult<Vec<UserId>> {
        let users: BTreeSet<UserId> = self
            .inner
            .read()
            .entries
            .iter()
            .map(|e| e.user_id.clone())
            .collect();
        Ok(users.into_iter().collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

use hrms_audit_types::{AuditAction, AuditLogEntry};
use hrms_common_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Counters shown above the audit log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total: u64,
    pub deletes: u64,
    pub distinct_users: u64,
    /// Entries created since midnight UTC.
    pub today: u64,
}

impl AuditSummary {
    /// Count one snapshot of the trail. `today` counts entries at or after
    /// `since`.
    pub fn from_entries(entries: &[AuditLogEntry], since: Timestamp) -> Self {
        let mut users = HashSet::new();
        let mut summary = Self::default();

        for entry in entries {
            summary.total += 1;
            if entry.action == AuditAction::Delete {
                summary.deletes += 1;
            }
            if entry.created_at >= since {
                summary.today += 1;
            }
            users.insert(&entry.user_id);
        }

        summary.distinct_users = users.len() as u64;
        summary
    }
}

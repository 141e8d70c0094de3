//! Audit log rendering for viewers.

use crate::Page;
use hrms_audit_types::{resource_label, AuditAction, AuditLogEntry};
use hrms_common_config::AuditConfig;
use hrms_common_core::UserId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Shown for actors that no longer resolve to a user.
pub const UNKNOWN_USER_LABEL: &str = "Unknown user";

/// Shown for the system actor.
pub const SYSTEM_LABEL: &str = "System";

/// Resolves actor ids to display names.
pub trait UserDirectory: Send + Sync {
    fn display_name(&self, user_id: &UserId) -> Option<String>;
}

/// Fixed id-to-name map.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    names: HashMap<UserId, String>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: impl Into<UserId>, name: impl Into<String>) -> Self {
        self.names.insert(id.into(), name.into());
        self
    }
}

impl UserDirectory for StaticUserDirectory {
    fn display_name(&self, user_id: &UserId) -> Option<String> {
        self.names.get(user_id).cloned()
    }
}

/// One rendered line of the audit log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogRow {
    pub id: i64,
    pub created_at: String,
    pub user_id: String,
    pub user: String,
    pub action: String,
    pub action_label: String,
    pub resource: String,
    pub resource_label: String,
    pub resource_id: Option<String>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}

/// Turns stored entries into rows.
///
/// Rendering never fails: missing users and unknown tags get fallback
/// labels.
#[derive(Clone)]
pub struct AuditLogView {
    directory: Arc<dyn UserDirectory>,
    per_page: usize,
}

impl AuditLogView {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self::from_config(directory, &AuditConfig::default())
    }

    /// View paging by `audit.default_page_size`.
    pub fn from_config(directory: Arc<dyn UserDirectory>, config: &AuditConfig) -> Self {
        Self {
            directory,
            per_page: config.default_page_size,
        }
    }

    /// Page size used when a caller does not ask for one.
    pub fn default_page_size(&self) -> usize {
        self.per_page
    }

    pub fn user_label(&self, user_id: &UserId) -> String {
        if user_id.is_system() {
            return SYSTEM_LABEL.to_string();
        }
        self.directory
            .display_name(user_id)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_USER_LABEL.to_string())
    }

    pub fn row(&self, entry: &AuditLogEntry) -> AuditLogRow {
        AuditLogRow {
            id: entry.id.get(),
            created_at: entry.created_at.to_iso8601(),
            user_id: entry.user_id.to_string(),
            user: self.user_label(&entry.user_id),
            action: entry.action.to_string(),
            action_label: entry.action.label(),
            resource: entry.resource.clone(),
            resource_label: resource_label(&entry.resource),
            resource_id: entry.resource_id.clone(),
            details: entry.details.as_ref().map(|d| d.to_string()),
            ip_address: entry.ip_address.clone(),
        }
    }

    pub fn rows(&self, entries: &[AuditLogEntry]) -> Vec<AuditLogRow> {
        entries.iter().map(|e| self.row(e)).collect()
    }

    /// Paginate a query result and render the requested page.
    ///
    /// `per_page` falls back to the configured default.
    pub fn page(
        &self,
        entries: Vec<AuditLogEntry>,
        page: usize,
        per_page: Option<usize>,
    ) -> Page<AuditLogRow> {
        let per_page = per_page.unwrap_or(self.per_page);
        Page::paginate(entries, page, per_page).map(|e| self.row(&e))
    }

    /// `(tag, label)` pairs for an action filter control.
    pub fn action_options() -> Vec<(String, String)> {
        AuditAction::standard()
            .map(|a| (a.to_string(), a.label()))
            .collect()
    }
}

//! Audit recorder for HRMS.
//!
//! [`AuditRecorder`] is the single write path into the audit trail: it
//! validates entries, appends them once, and serves filtered reads and
//! aggregate counts. [`AuditContext`] stamps request metadata onto new
//! entries; [`AuditLogView`] renders stored entries for people.

mod context;
mod page;
mod recorder;
mod summary;
mod view;

pub use context::AuditContext;
pub use page::Page;
pub use recorder::{AuditRecorder, RecorderConfig};
pub use summary::AuditSummary;
pub use view::{AuditLogRow, AuditLogView, StaticUserDirectory, UserDirectory, SYSTEM_LABEL, UNKNOWN_USER_LABEL};

pub use hrms_audit_types::{
    AuditAction, AuditError, AuditLogEntry, AuditQueryFilter, AuditResult, NewAuditLogEntry,
};

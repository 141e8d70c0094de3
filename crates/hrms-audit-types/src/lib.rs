//! Audit log entry types for HRMS.

mod action;
mod entry;
mod error;
mod filter;
mod id;
mod label;

pub use action::AuditAction;
pub use entry::{AuditLogEntry, NewAuditLogEntry, NewAuditLogEntryBuilder, ValidatedEntry};
pub use error::{AuditError, AuditResult, EntryField};
pub use filter::AuditQueryFilter;
pub use id::AuditEntryId;
pub use label::{resource_label, title_case, UNKNOWN_LABEL};

pub use hrms_common_core::{CompanyId, Timestamp, UserId};

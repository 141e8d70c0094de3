//! Audit errors.

use std::fmt;
use thiserror::Error;

/// Required field of a new audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    UserId,
    Action,
    Resource,
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserId => "user_id",
            Self::Action => "action",
            Self::Resource => "resource",
        })
    }
}

/// Errors surfaced by the audit recorder.
///
/// Denied authorization is never one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// A required field was missing or blank. Nothing was written.
    #[error("invalid audit entry: {field} is required")]
    InvalidEntry { field: EntryField },

    /// The backing store could not complete the call.
    #[error("audit storage unavailable: {reason}")]
    StorageUnavailable { reason: String },
}

impl AuditError {
    pub fn invalid(field: EntryField) -> Self {
        Self::InvalidEntry { field }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            reason: reason.into(),
        }
    }

    /// Caller error (reject the request) as opposed to infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidEntry { .. })
    }
}

/// Result alias for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

//! Store errors.

use hrms_audit_types::AuditError;
use thiserror::Error;

/// Store operation result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration {version} failed: {reason}")]
    Migration { version: i64, reason: String },

    #[error("migration {version} checksum mismatch")]
    ChecksumMismatch { version: i64 },

    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("stored entry {id} is unreadable: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store closed")]
    Closed,
}

impl From<StoreError> for AuditError {
    fn from(err: StoreError) -> Self {
        AuditError::unavailable(err.to_string())
    }
}

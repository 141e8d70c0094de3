//! Audit entry identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier, strictly increasing within one store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditEntryId(i64);

impl AuditEntryId {
    /// Wrap a raw id.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AuditEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aud_{}", self.0)
    }
}

impl fmt::Debug for AuditEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuditEntryId({})", self.0)
    }
}

//! Append-only persistence for the HRMS audit trail.
//!
//! Two backends implement [`AuditStore`]:
//!
//! - [`MemoryAuditStore`]: process-local, for tests and single-node setups.
//! - [`SqliteAuditStore`]: durable, one `audit_logs` table.
//!
//! Neither exposes update or delete.

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryAuditStore;
pub use sqlite::{
    Migration, MigrationRunner, SqliteAuditStore, StorePoolConfig, StorePoolConfigBuilder,
    SynchronousMode,
};
pub use store::{sort_newest_first, AuditStore, StoreStats};

//! SQLite backend.

mod migration;
mod pool;
mod schema;
mod store;

pub use migration::{Migration, MigrationRunner};
pub use pool::{StorePoolConfig, StorePoolConfigBuilder, SynchronousMode};
pub use store::SqliteAuditStore;

use crate::{StoreError, StoreResult};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// SQLite durability level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SynchronousMode {
    Normal,
    #[default]
    Full,
    Extra,
}

impl From<SynchronousMode> for SqliteSynchronous {
    fn from(mode: SynchronousMode) -> Self {
        match mode {
            SynchronousMode::Normal => SqliteSynchronous::Normal,
            SynchronousMode::Full => SqliteSynchronous::Full,
            SynchronousMode::Extra => SqliteSynchronous::Extra,
        }
    }
}

/// Connection settings for the audit database.
#[derive(Debug, Clone)]
pub struct StorePoolConfig {
    /// Path to the SQLite database file
    pub database_path: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Enable WAL mode so readers never block the appender
    pub wal_mode: bool,
    pub synchronous: SynchronousMode,
    /// Busy timeout for a locked database
    pub busy_timeout: Duration,
    pub create_if_missing: bool,
}

impl Default for StorePoolConfig {
    fn default() -> Self {
        Self {
            database_path: "hrms-audit.db".to_string(),
            min_connections: 1,
            max_connections: 8,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            wal_mode: true,
            synchronous: SynchronousMode::Full,
            busy_timeout: Duration::from_secs(5),
            create_if_missing: true,
        }
    }
}

impl StorePoolConfig {
    pub fn builder() -> StorePoolConfigBuilder {
        StorePoolConfigBuilder::default()
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "database_path must not be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(StoreError::InvalidConfig(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(StoreError::InvalidConfig(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }
        Ok(())
    }

    fn connect_options(&self) -> StoreResult<SqliteConnectOptions> {
        let mut options = SqliteConnectOptions::from_str(&format!("sqlite:{}", self.database_path))
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?
            .create_if_missing(self.create_if_missing)
            .busy_timeout(self.busy_timeout)
            .synchronous(self.synchronous.into());

        if self.wal_mode {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }
        Ok(options)
    }

    /// Open a pool with these settings.
    #[instrument(skip(self), fields(path = %self.database_path))]
    pub(crate) async fn connect(&self) -> StoreResult<SqlitePool> {
        self.validate()?;

        let pool = SqlitePoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Some(self.idle_timeout))
            .connect_with(self.connect_options()?)
            .await?;

        info!(
            max_connections = self.max_connections,
            "audit database pool created"
        );
        Ok(pool)
    }
}

#[derive(Default)]
pub struct StorePoolConfigBuilder {
    config: StorePoolConfig,
}

impl StorePoolConfigBuilder {
    pub fn database_path(mut self, path: impl Into<String>) -> Self {
        self.config.database_path = path.into();
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.config.min_connections = min;
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.config.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.config.acquire_timeout = timeout;
        self
    }

    pub fn wal_mode(mut self, enabled: bool) -> Self {
        self.config.wal_mode = enabled;
        self
    }

    pub fn synchronous(mut self, mode: SynchronousMode) -> Self {
        self.config.synchronous = mode;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.config.busy_timeout = timeout;
        self
    }

    pub fn build(self) -> StoreResult<StorePoolConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let result = StorePoolConfig::builder()
            .min_connections(10)
            .max_connections(5)
            .build();
        assert!(matches!(result, Err(StoreError::InvalidConfig(_))));

        let result = StorePoolConfig::builder().database_path("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder() {
        let config = StorePoolConfig::builder()
            .database_path("/tmp/audit.db")
            .max_connections(2)
            .wal_mode(false)
            .build()
            .unwrap();

        assert_eq!(config.max_connections, 2);
        assert!(!config.wal_mode);
        assert_eq!(config.synchronous, SynchronousMode::Full);
    }
}

//! Forward-only schema migrations with checksums.

use crate::{StoreError, StoreResult};
use sha2::{Digest, Sha256};
use sqlx::{Executor, Row, SqlitePool};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// One schema change.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub sql: String,
    /// SHA-256 of `sql`
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let checksum = Self::compute_checksum(&sql);
        Self {
            version,
            name: name.into(),
            sql,
            checksum,
        }
    }

    pub fn compute_checksum(sql: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(sql.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Applies pending migrations and refuses to run over edited ones.
pub struct MigrationRunner {
    pool: SqlitePool,
    migrations: BTreeMap<i64, Migration>,
}

impl MigrationRunner {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            migrations: BTreeMap::new(),
        }
    }

    pub fn add_migrations(&mut self, migrations: impl IntoIterator<Item = Migration>) {
        for migration in migrations {
            self.migrations.insert(migration.version, migration);
        }
    }

    async fn init(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _hrms_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                checksum TEXT NOT NULL,
                applied_at TEXT NOT NULL,
                execution_time_ms INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Applied versions and their recorded checksums.
    pub async fn applied(&self) -> StoreResult<BTreeMap<i64, String>> {
        self.init().await?;
        let rows = sqlx::query("SELECT version, checksum FROM _hrms_migrations ORDER BY version")
            .fetch_all(&self.pool)
            .await?;

        let mut applied = BTreeMap::new();
        for row in rows {
            applied.insert(row.try_get("version")?, row.try_get("checksum")?);
        }
        Ok(applied)
    }

    /// Highest applied version.
    pub async fn current_version(&self) -> StoreResult<Option<i64>> {
        Ok(self.applied().await?.keys().next_back().copied())
    }

    /// Verify recorded checksums, then apply everything not yet applied.
    ///
    /// Returns the versions applied by this call.
    pub async fn run(&self) -> StoreResult<Vec<i64>> {
        let applied = self.applied().await?;

        for (version, checksum) in &applied {
            if let Some(known) = self.migrations.get(version) {
                if &known.checksum != checksum {
                    return Err(StoreError::ChecksumMismatch { version: *version });
                }
            }
        }

        let mut ran = Vec::new();
        for migration in self.migrations.values() {
            if applied.contains_key(&migration.version) {
                continue;
            }
            self.apply(migration).await?;
            ran.push(migration.version);
        }

        if ran.is_empty() {
            debug!("audit schema up to date");
        }
        Ok(ran)
    }

    async fn apply(&self, migration: &Migration) -> StoreResult<()> {
        info!(version = migration.version, name = %migration.name, "applying migration");
        let start = Instant::now();

        let mut tx = self.pool.begin().await?;
        (&mut *tx)
            .execute(migration.sql.as_str())
            .await
            .map_err(|e| StoreError::Migration {
                version: migration.version,
                reason: e.to_string(),
            })?;

        sqlx::query(
            "INSERT INTO _hrms_migrations (version, name, checksum, applied_at, execution_time_ms)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(migration.version)
        .bind(&migration.name)
        .bind(&migration.checksum)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(start.elapsed().as_millis() as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

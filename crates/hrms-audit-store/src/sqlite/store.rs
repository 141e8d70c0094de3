use super::schema::{migrations, NOW_SQL};
use super::{MigrationRunner, StorePoolConfig};
use crate::store::AuditStore;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use hrms_audit_types::{
    AuditAction, AuditEntryId, AuditLogEntry, AuditQueryFilter, CompanyId, Timestamp, UserId,
    ValidatedEntry,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

const SELECT_COLUMNS: &str = "SELECT id, user_id, action, resource, resource_id, details, \
     ip_address, user_agent, company_id, created_at FROM audit_logs WHERE 1 = 1";

/// Durable store over one append-only `audit_logs` table.
///
/// Structured criteria are pushed into SQL. Free-text search runs over the
/// decoded rows with the same matcher the memory store uses, so both
/// backends return the same entries for the same filter.
pub struct SqliteAuditStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i64,
    user_id: String,
    action: String,
    resource: String,
    resource_id: Option<String>,
    details: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    company_id: Option<String>,
    created_at: String,
}

impl TryFrom<AuditRow> for AuditLogEntry {
    type Error = StoreError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt { id: row.id, reason };

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| corrupt(format!("created_at: {e}")))?
            .with_timezone(&Utc);
        let details = row
            .details
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .map_err(|e| corrupt(format!("details: {e}")))?;

        Ok(AuditLogEntry {
            id: AuditEntryId::new(row.id),
            user_id: UserId::new(row.user_id),
            action: AuditAction::parse(&row.action),
            resource: row.resource,
            resource_id: row.resource_id,
            details,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            company_id: row.company_id.map(CompanyId::new),
            created_at: Timestamp::from_datetime(created_at),
        })
    }
}

fn sql_time(ts: Timestamp) -> String {
    ts.as_datetime().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl SqliteAuditStore {
    /// Open the database and bring the schema up to date.
    pub async fn open(config: &StorePoolConfig) -> StoreResult<Self> {
        let pool = config.connect().await?;
        Self::with_pool(pool).await
    }

    /// Use an existing pool, applying pending migrations.
    pub async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        let mut runner = MigrationRunner::new(pool.clone());
        runner.add_migrations(migrations());
        runner.run().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool; later calls fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.pool.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    fn push_criteria(qb: &mut QueryBuilder<'_, Sqlite>, filter: &AuditQueryFilter) {
        if let Some(user) = &filter.user_id {
            qb.push(" AND user_id = ").push_bind(user.as_str().to_string());
        }
        if let Some(action) = &filter.action {
            qb.push(" AND action = ")
                .push_bind(action.as_str().to_string())
                .push(" COLLATE NOCASE");
        }
        if let Some(resource) = &filter.resource {
            qb.push(" AND resource = ")
                .push_bind(resource.clone())
                .push(" COLLATE NOCASE");
        }
        if let Some(company) = &filter.company_id {
            qb.push(" AND company_id = ").push_bind(company.as_str().to_string());
        }
        // Stored times are whole milliseconds; these bounds are a superset
        // that the in-process matcher narrows.
        if let Some(from) = filter.from {
            qb.push(" AND created_at >= ").push_bind(sql_time(from));
        }
        if let Some(to) = filter.to {
            qb.push(" AND created_at <= ").push_bind(sql_time(to));
        }
    }
}

#[async_trait]
impl AuditStore for SqliteAuditStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    #[instrument(skip(self, entry))]
    async fn append(&self, entry: ValidatedEntry) -> StoreResult<AuditLogEntry> {
        self.ensure_open()?;
        let new = entry.entry();
        let details = new.details.as_ref().map(serde_json::to_string).transpose()?;

        let sql = format!(
            "INSERT INTO audit_logs (user_id, action, resource, resource_id, details, \
             ip_address, user_agent, company_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, \
             MAX({NOW_SQL}, COALESCE((SELECT MAX(created_at) FROM audit_logs), ''))) \
             RETURNING id, created_at"
        );
        // Stepped to completion so the implicit transaction has committed
        // before the entry is reported as stored.
        let rows: Vec<(i64, String)> = sqlx::query_as(&sql)
            .bind(new.user_id.as_str())
            .bind(new.action.as_str())
            .bind(&new.resource)
            .bind(new.resource_id.as_deref())
            .bind(details)
            .bind(new.ip_address.as_deref())
            .bind(new.user_agent.as_deref())
            .bind(new.company_id.as_ref().map(|c| c.as_str()))
            .fetch_all(&self.pool)
            .await?;
        let (id, created_at) = rows
            .into_iter()
            .next()
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;

        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::Corrupt {
                id,
                reason: format!("created_at: {e}"),
            })?
            .with_timezone(&Utc);

        debug!(id, "appended audit entry");
        Ok(entry.into_entry(AuditEntryId::new(id), Timestamp::from_datetime(created_at)))
    }

    async fn query(&self, filter: &AuditQueryFilter) -> StoreResult<Vec<AuditLogEntry>> {
        self.ensure_open()?;
        let mut qb = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        Self::push_criteria(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb.build_query_as::<AuditRow>().fetch_all(&self.pool).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let entry = AuditLogEntry::try_from(row)?;
            if filter.matches(&entry) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    async fn count(&self, filter: &AuditQueryFilter) -> StoreResult<u64> {
        self.ensure_open()?;
        let exact_in_sql =
            filter.search_term().is_none() && filter.from.is_none() && filter.to.is_none();
        if !exact_in_sql {
            return Ok(self.query(filter).await?.len() as u64);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM audit_logs WHERE 1 = 1");
        Self::push_criteria(&mut qb, filter);
        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn distinct_users(&self) -> StoreResult<Vec<UserId>> {
        self.ensure_open()?;
        let users: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT user_id FROM audit_logs ORDER BY user_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(users.into_iter().map(|(u,)| UserId::new(u)).collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.ensure_open()?;
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

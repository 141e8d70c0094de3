//! Audit schema migrations.

use super::Migration;

/// Timestamp format written by SQLite: fixed width, so text order is time order.
pub(crate) const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

pub(crate) fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_audit_logs",
            r#"
            CREATE TABLE IF NOT EXISTS audit_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                action TEXT NOT NULL,
                resource TEXT NOT NULL,
                resource_id TEXT,
                details TEXT,
                ip_address TEXT,
                user_agent TEXT,
                company_id TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_audit_logs_created_at ON audit_logs (created_at);
            CREATE INDEX IF NOT EXISTS idx_audit_logs_user_id ON audit_logs (user_id);
            CREATE INDEX IF NOT EXISTS idx_audit_logs_action ON audit_logs (action);
            CREATE INDEX IF NOT EXISTS idx_audit_logs_resource ON audit_logs (resource COLLATE NOCASE);
            "#,
        ),
        Migration::new(
            2,
            "audit_logs_append_only",
            r#"
            CREATE TRIGGER IF NOT EXISTS audit_logs_no_update
            BEFORE UPDATE ON audit_logs
            BEGIN
                SELECT RAISE(ABORT, 'audit_logs is append-only');
            END;
            CREATE TRIGGER IF NOT EXISTS audit_logs_no_delete
            BEFORE DELETE ON audit_logs
            BEGIN
                SELECT RAISE(ABORT, 'audit_logs is append-only');
            END;
            "#,
        ),
        Migration::new(
            3,
            "index_audit_logs_company",
            "CREATE INDEX IF NOT EXISTS idx_audit_logs_company_id ON audit_logs (company_id)",
        ),
    ]
}

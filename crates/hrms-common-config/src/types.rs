//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrmsConfig {
    pub audit: AuditConfig,
    pub gate: GateConfig,
    pub logging: LoggingConfig,
}

/// Where audit entries are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

/// Audit recorder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub backend: StoreBackend,
    /// SQLite file, used by the `sqlite` backend.
    pub database_path: PathBuf,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Upper bound on a single storage call.
    pub operation_timeout_ms: u64,
    /// Page size offered to audit viewers.
    pub default_page_size: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_path: PathBuf::from("hrms-audit.db"),
            min_connections: 1,
            max_connections: 8,
            operation_timeout_ms: 5_000,
            default_page_size: 25,
        }
    }
}

impl AuditConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

/// What the gate does when it cannot record an attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFailurePolicy {
    /// Refuse the request.
    #[default]
    FailClosed,
    /// Log the failure and honour the authorization decision.
    FailOpen,
}

/// Access gate settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub audit_failure_policy: AuditFailurePolicy,
}

/// Logging settings; environment variables take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty`, `compact` or `json`.
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HrmsConfig::default();
        assert_eq!(config.audit.backend, StoreBackend::Memory);
        assert_eq!(config.audit.operation_timeout(), Duration::from_secs(5));
        assert_eq!(config.gate.audit_failure_policy, AuditFailurePolicy::FailClosed);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_yaml_merges_with_defaults() {
        let yaml = r#"
audit:
  backend: sqlite
  database_path: /var/lib/hrms/audit.db
gate:
  audit_failure_policy: fail_open
"#;
        let config: HrmsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.audit.backend, StoreBackend::Sqlite);
        assert_eq!(config.audit.database_path, PathBuf::from("/var/lib/hrms/audit.db"));
        assert_eq!(config.audit.max_connections, 8);
        assert_eq!(config.gate.audit_failure_policy, AuditFailurePolicy::FailOpen);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_serializes_snake_case() {
        let yaml = serde_yaml::to_string(&HrmsConfig::default()).unwrap();
        assert!(yaml.contains("backend: memory"));
        assert!(yaml.contains("audit_failure_policy: fail_closed"));
    }
}

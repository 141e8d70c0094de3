//! Configuration file loading and parsing.

use crate::env::{vars, EnvError, Environment};
use crate::types::{HrmsConfig, StoreBackend};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Env(#[from] EnvError),
}

const CONFIG_DIR: &str = ".hrms";
const CONFIG_FILE: &str = "config.yaml";

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the config file this loader reads.
    pub fn config_path(&self) -> PathBuf {
        if let Some(explicit) = Environment::get(vars::HRMS_CONFIG_PATH) {
            return PathBuf::from(explicit);
        }
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration; defaults when the file does not exist.
    ///
    /// `.env` files in the project directory are loaded first so their
    /// values feed `${VAR}` expansion. `HRMS_AUDIT_BACKEND` and
    /// `HRMS_AUDIT_DB` override the file.
    pub fn load(&self) -> Result<HrmsConfig, ConfigError> {
        Environment::init_in(&self.base_path)?;
        let config_path = self.config_path();

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let expanded = self.expand_env_vars(&contents)?;
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?
        } else {
            HrmsConfig::default()
        };

        self.apply_env_overrides(&mut config)?;
        self.validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
            ConfigError::ValidationError {
                message: e.to_string(),
            }
        })?;

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let default = cap.get(2).map(|m| m.as_str());

            let value = match std::env::var(var_name) {
                Ok(v) => v,
                Err(_) => match default {
                    Some(d) => d.to_string(),
                    None => {
                        return Err(ConfigError::EnvVarNotFound {
                            var: var_name.to_string(),
                        })
                    }
                },
            };

            result = result.replace(&cap[0], &value);
        }

        Ok(result)
    }

    fn apply_env_overrides(&self, config: &mut HrmsConfig) -> Result<(), ConfigError> {
        if let Some(backend) = Environment::get(vars::HRMS_AUDIT_BACKEND) {
            config.audit.backend = match backend.to_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "sqlite" => StoreBackend::Sqlite,
                other => {
                    return Err(ConfigError::ValidationError {
                        message: format!("unknown audit backend: {other}"),
                    })
                }
            };
        }
        if let Some(path) = Environment::get(vars::HRMS_AUDIT_DB) {
            config.audit.database_path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self, config: &HrmsConfig) -> Result<(), ConfigError> {
        let audit = &config.audit;

        if audit.max_connections == 0 {
            return Err(ConfigError::ValidationError {
                message: "audit.max_connections must be greater than 0".to_string(),
            });
        }
        if audit.min_connections > audit.max_connections {
            return Err(ConfigError::ValidationError {
                message: "audit.min_connections cannot exceed audit.max_connections".to_string(),
            });
        }
        if audit.operation_timeout_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "audit.operation_timeout_ms must be greater than 0".to_string(),
            });
        }
        if audit.default_page_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "audit.default_page_size must be greater than 0".to_string(),
            });
        }
        if audit.backend == StoreBackend::Sqlite && audit.database_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "audit.database_path is required for the sqlite backend".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to [`config_path`](Self::config_path).
    pub fn save(&self, config: &HrmsConfig) -> Result<(), ConfigError> {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

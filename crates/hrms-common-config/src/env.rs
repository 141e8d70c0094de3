//! Environment variable handling.

use std::env;
use std::path::Path;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    pub const HRMS_ENV: &str = "HRMS_ENV";
    pub const HRMS_CONFIG_PATH: &str = "HRMS_CONFIG_PATH";

    // Audit
    pub const HRMS_AUDIT_BACKEND: &str = "HRMS_AUDIT_BACKEND";
    pub const HRMS_AUDIT_DB: &str = "HRMS_AUDIT_DB";

    // Logging
    pub const HRMS_LOG_LEVEL: &str = "HRMS_LOG_LEVEL";
    pub const HRMS_LOG_FORMAT: &str = "HRMS_LOG_FORMAT";
    pub const HRMS_LOG_FILE: &str = "HRMS_LOG_FILE";
    pub const HRMS_LOG_SOURCE: &str = "HRMS_LOG_SOURCE";
    pub const HRMS_LOG_SPANS: &str = "HRMS_LOG_SPANS";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Process environment access.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Load `.env`, `.env.local` and `.env.<HRMS_ENV>` from `dir`.
    ///
    /// Variables already set are kept. Missing files are skipped; a file
    /// that exists but cannot be parsed is an error.
    pub fn init_in(dir: impl AsRef<Path>) -> Result<Self, EnvError> {
        let dir = dir.as_ref();
        load_file(&dir.join(".env"))?;
        load_file(&dir.join(".env.local"))?;

        if let Some(env) = Self::get(vars::HRMS_ENV) {
            load_file(&dir.join(format!(".env.{env}")))?;
        }

        Ok(Self { _guard: () })
    }

    /// Get an optional string variable. Blank values count as unset.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.trim().is_empty())
    }

    /// `true`, `1` and `yes` are true; anything else set is false.
    pub fn get_bool(var: &str) -> Option<bool> {
        Self::get(var).map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
    }
}

fn load_file(path: &Path) -> Result<(), EnvError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_blank_is_unset() {
        env::set_var("HRMS_TEST_BLANK", "  ");
        assert_eq!(Environment::get("HRMS_TEST_BLANK"), None);
        env::remove_var("HRMS_TEST_BLANK");
    }

    #[test]
    fn test_bool_parsing() {
        env::set_var("HRMS_TEST_BOOL", "yes");
        assert_eq!(Environment::get_bool("HRMS_TEST_BOOL"), Some(true));
        env::set_var("HRMS_TEST_BOOL", "off");
        assert_eq!(Environment::get_bool("HRMS_TEST_BOOL"), Some(false));
        env::remove_var("HRMS_TEST_BOOL");
        assert_eq!(Environment::get_bool("HRMS_TEST_BOOL"), None);
    }

    #[test]
    fn test_dotenv_file_loading() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".env"), "HRMS_TEST_DOTENV=from_dotenv\n").unwrap();

        env::remove_var("HRMS_TEST_DOTENV");
        Environment::init_in(dir.path()).unwrap();
        assert_eq!(
            Environment::get("HRMS_TEST_DOTENV"),
            Some("from_dotenv".to_string())
        );
        env::remove_var("HRMS_TEST_DOTENV");
    }

    #[test]
    fn test_init_without_files() {
        let dir = tempdir().unwrap();
        assert!(Environment::init_in(dir.path()).is_ok());
    }

    #[test]
    fn test_malformed_dotenv_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".env.local"), "this is not valid\n").unwrap();

        match Environment::init_in(dir.path()) {
            Err(EnvError::DotenvError(e)) => assert!(!e.not_found()),
            Ok(_) => panic!("expected a parse error"),
        }
    }
}

//! Logging infrastructure for the HRMS access and audit core.

use hrms_common_config::{vars, Environment, LoggingConfig};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    pub format: LogFormat,
    /// Also append to this file.
    pub file_path: Option<PathBuf>,
    /// Include source location.
    pub source_location: bool,
    /// Include span open/close events.
    pub span_events: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        }
    }
}

impl LogLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Unknown names fall back to pretty.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            source_location: false,
            span_events: false,
        }
    }
}

impl LogConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// File settings, then environment variables on top.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            level: LogLevel::parse(&settings.level).unwrap_or_default(),
            format: LogFormat::parse(&settings.format),
            file_path: settings.file.clone(),
            ..Self::default()
        }
        .with_env_overrides()
    }

    /// `HRMS_LOG_*` variables, with `RUST_LOG` as the level fallback.
    pub fn with_env_overrides(mut self) -> Self {
        let level = Environment::get(vars::HRMS_LOG_LEVEL)
            .or_else(|| Environment::get(vars::RUST_LOG))
            .and_then(|l| LogLevel::parse(&l));
        if let Some(level) = level {
            self.level = level;
        }

        if let Some(format) = Environment::get(vars::HRMS_LOG_FORMAT) {
            self.format = LogFormat::parse(&format);
        }
        if let Some(file_path) = Environment::get(vars::HRMS_LOG_FILE) {
            self.file_path = Some(PathBuf::from(file_path));
        }
        if let Some(source) = Environment::get_bool(vars::HRMS_LOG_SOURCE) {
            self.source_location = source;
        }
        if let Some(spans) = Environment::get_bool(vars::HRMS_LOG_SPANS) {
            self.span_events = spans;
        }
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn layer<S, W>(&self, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let base = fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(true)
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_span_events(self.span_events());

        match self.format {
            LogFormat::Pretty => base.boxed(),
            LogFormat::Compact => base.compact().boxed(),
            LogFormat::Json => base.json().boxed(),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` directives, when valid, replace the configured level filter.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let mut layers = vec![config.layer(io::stderr, true)];
    if let Some(path) = &config.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        layers.push(config.layer(Mutex::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

pub use tracing::{debug, error, info, trace, warn};

pub mod spans;

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const LOG_VARS: [&str; 6] = [
        vars::HRMS_LOG_LEVEL,
        vars::HRMS_LOG_FORMAT,
        vars::HRMS_LOG_FILE,
        vars::HRMS_LOG_SOURCE,
        vars::HRMS_LOG_SPANS,
        vars::RUST_LOG,
    ];

    fn with_clean_env(test: impl FnOnce()) {
        let saved: Vec<_> = LOG_VARS.iter().map(|v| (*v, env::var(v).ok())).collect();
        for var in LOG_VARS {
            env::remove_var(var);
        }
        test();
        for (var, value) in saved {
            match value {
                Some(v) => env::set_var(var, v),
                None => env::remove_var(var),
            }
        }
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("Warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("invalid"), None);
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("fancy"), LogFormat::Pretty);
    }

    // Environment tests share process state, so they run in one test.
    #[test]
    fn test_env_overrides() {
        with_clean_env(|| {
            env::set_var(vars::HRMS_LOG_LEVEL, "debug");
            env::set_var(vars::HRMS_LOG_FORMAT, "json");
            env::set_var(vars::HRMS_LOG_FILE, "/tmp/hrms-test.log");
            env::set_var(vars::HRMS_LOG_SOURCE, "true");
            env::set_var(vars::HRMS_LOG_SPANS, "1");

            let config = LogConfig::from_env();
            assert_eq!(config.level, LogLevel::Debug);
            assert_eq!(config.format, LogFormat::Json);
            assert_eq!(config.file_path, Some(PathBuf::from("/tmp/hrms-test.log")));
            assert!(config.source_location);
            assert!(config.span_events);
        });

        with_clean_env(|| {
            env::set_var(vars::RUST_LOG, "warn");
            assert_eq!(LogConfig::from_env().level, LogLevel::Warn);
        });

        with_clean_env(|| {
            let settings = LoggingConfig {
                level: "error".to_string(),
                format: "compact".to_string(),
                file: None,
            };
            let config = LogConfig::from_settings(&settings);
            assert_eq!(config.level, LogLevel::Error);
            assert_eq!(config.format, LogFormat::Compact);
        });
    }
}

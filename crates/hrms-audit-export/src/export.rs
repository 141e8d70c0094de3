//! Export configuration, errors and the writer trait.

use hrms_audit_types::{AuditError, AuditLogEntry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Columns available for export, in output order.
pub const COLUMNS: &[&str] = &[
    "id",
    "created_at",
    "user_id",
    "action",
    "resource",
    "resource_id",
    "details",
    "ip_address",
    "user_agent",
    "company_id",
];

/// Export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// One JSON object per line.
    JsonLines,
    /// Pretty-printed JSON array.
    JsonPretty,
    Csv,
}

impl ExportFormat {
    /// Conventional file extension, without compression suffix.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::JsonLines => "jsonl",
            Self::JsonPretty => "json",
            Self::Csv => "csv",
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Columns to include (empty = all), see [`COLUMNS`].
    #[serde(default)]
    pub fields: Vec<String>,
    /// Compress output with gzip.
    #[serde(default)]
    pub compress: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::JsonLines,
            fields: Vec::new(),
            compress: false,
        }
    }
}

impl ExportConfig {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }

    /// File name suffix including `.gz` when compressed.
    pub fn file_extension(&self) -> String {
        if self.compress {
            format!("{}.gz", self.format.extension())
        } else {
            self.format.extension().to_string()
        }
    }

    /// Reject unknown column names.
    pub fn validate(&self) -> ExportResult<()> {
        match self.fields.iter().find(|f| !COLUMNS.contains(&f.as_str())) {
            Some(unknown) => Err(ExportError::UnknownField(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Selected columns in output order.
    pub fn columns(&self) -> Vec<&'static str> {
        COLUMNS
            .iter()
            .copied()
            .filter(|c| self.fields.is_empty() || self.fields.iter().any(|f| f == c))
            .collect()
    }
}

/// Export progress callback.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

/// Export progress information.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportProgress {
    pub exported: u64,
    pub total: Option<u64>,
    pub bytes_written: u64,
    pub percent_complete: Option<f32>,
}

impl ExportProgress {
    pub fn new(exported: u64, total: Option<u64>, bytes_written: u64) -> Self {
        let percent_complete = total.map(|t| if t > 0 { exported as f32 / t as f32 * 100.0 } else { 100.0 });
        Self {
            exported,
            total,
            bytes_written,
            percent_complete,
        }
    }
}

/// Export error.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("audit query failed: {0}")]
    Audit(#[from] AuditError),
    #[error("unknown export field: {0}")]
    UnknownField(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Trait for export writers.
pub trait ExportWriter: Send {
    fn write_header(&mut self) -> ExportResult<()>;

    fn write_entry(&mut self, entry: &AuditLogEntry) -> ExportResult<()>;

    fn write_footer(&mut self) -> ExportResult<()>;

    /// Flush buffered data and complete any compression stream.
    ///
    /// Nothing may be written afterwards.
    fn finish(&mut self) -> ExportResult<()>;

    /// Bytes handed to the underlying writer so far.
    fn bytes_written(&self) -> u64;
}

/// Value of one column as JSON.
pub(crate) fn column_value(entry: &AuditLogEntry, column: &str) -> Value {
    let text = |s: Option<&str>| s.map_or(Value::Null, |s| Value::String(s.to_string()));
    match column {
        "id" => Value::from(entry.id.get()),
        "created_at" => Value::String(entry.created_at.to_iso8601()),
        "user_id" => Value::String(entry.user_id.to_string()),
        "action" => Value::String(entry.action.to_string()),
        "resource" => Value::String(entry.resource.clone()),
        "resource_id" => text(entry.resource_id.as_deref()),
        "details" => entry.details.clone().unwrap_or(Value::Null),
        "ip_address" => text(entry.ip_address.as_deref()),
        "user_agent" => text(entry.user_agent.as_deref()),
        "company_id" => text(entry.company_id.as_ref().map(|c| c.as_str())),
        _ => Value::Null,
    }
}

/// Entry as a JSON object restricted to `columns`.
pub(crate) fn entry_object(entry: &AuditLogEntry, columns: &[&str]) -> Value {
    let map: Map<String, Value> = columns
        .iter()
        .map(|c| (c.to_string(), column_value(entry, c)))
        .collect();
    Value::Object(map)
}

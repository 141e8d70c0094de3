//! CSV exporter.

use crate::export::{column_value, ExportConfig, ExportError, ExportResult, ExportWriter};
use crate::sink::Sink;
use hrms_audit_types::AuditLogEntry;
use serde_json::Value;
use std::io::Write;

/// RFC 4180 CSV with a header row. `details` is written as compact JSON.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<Sink<W>>,
    columns: Vec<&'static str>,
}

impl<W: Write> CsvExporter<W> {
    pub fn new(writer: W, config: ExportConfig) -> Self {
        Self {
            writer: csv::Writer::from_writer(Sink::new(writer, config.compress)),
            columns: config.columns(),
        }
    }

    pub fn into_inner(self) -> ExportResult<W> {
        let sink = self
            .writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))?;
        Ok(sink.into_inner()?)
    }
}

fn cell(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl<W: Write + Send> ExportWriter for CsvExporter<W> {
    fn write_header(&mut self) -> ExportResult<()> {
        self.writer.write_record(&self.columns)?;
        Ok(())
    }

    fn write_entry(&mut self, entry: &AuditLogEntry) -> ExportResult<()> {
        let record = self.columns.iter().map(|c| cell(column_value(entry, c)));
        self.writer.write_record(record)?;
        Ok(())
    }

    fn write_footer(&mut self) -> ExportResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        self.writer.flush()?;
        Ok(self.writer.get_mut().finish()?)
    }

    /// Lags behind until the CSV buffer is flushed.
    fn bytes_written(&self) -> u64 {
        self.writer.get_ref().bytes_written()
    }
}

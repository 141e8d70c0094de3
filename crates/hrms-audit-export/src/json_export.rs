//! JSON exporters.

use crate::export::{entry_object, ExportConfig, ExportResult, ExportWriter};
use crate::sink::Sink;
use hrms_audit_types::AuditLogEntry;
use std::io::Write;

/// One JSON object per line.
pub struct JsonLinesExporter<W: Write> {
    sink: Sink<W>,
    columns: Vec<&'static str>,
}

impl<W: Write> JsonLinesExporter<W> {
    pub fn new(writer: W, config: ExportConfig) -> Self {
        Self {
            sink: Sink::new(writer, config.compress),
            columns: config.columns(),
        }
    }

    /// Finish the stream and return the destination.
    pub fn into_inner(self) -> ExportResult<W> {
        Ok(self.sink.into_inner()?)
    }
}

impl<W: Write + Send> ExportWriter for JsonLinesExporter<W> {
    fn write_header(&mut self) -> ExportResult<()> {
        Ok(())
    }

    fn write_entry(&mut self, entry: &AuditLogEntry) -> ExportResult<()> {
        serde_json::to_writer(&mut self.sink, &entry_object(entry, &self.columns))?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    fn write_footer(&mut self) -> ExportResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        Ok(self.sink.finish()?)
    }

    fn bytes_written(&self) -> u64 {
        self.sink.bytes_written()
    }
}

/// A single pretty-printed JSON array.
pub struct JsonPrettyExporter<W: Write> {
    sink: Sink<W>,
    columns: Vec<&'static str>,
    written: u64,
}

impl<W: Write> JsonPrettyExporter<W> {
    pub fn new(writer: W, config: ExportConfig) -> Self {
        Self {
            sink: Sink::new(writer, config.compress),
            columns: config.columns(),
            written: 0,
        }
    }

    pub fn into_inner(self) -> ExportResult<W> {
        Ok(self.sink.into_inner()?)
    }
}

impl<W: Write + Send> ExportWriter for JsonPrettyExporter<W> {
    fn write_header(&mut self) -> ExportResult<()> {
        self.sink.write_all(b"[")?;
        Ok(())
    }

    fn write_entry(&mut self, entry: &AuditLogEntry) -> ExportResult<()> {
        let separator: &[u8] = if self.written == 0 { b"\n" } else { b",\n" };
        self.sink.write_all(separator)?;
        serde_json::to_writer_pretty(&mut self.sink, &entry_object(entry, &self.columns))?;
        self.written += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> ExportResult<()> {
        let closing: &[u8] = if self.written == 0 { b"]\n" } else { b"\n]\n" };
        self.sink.write_all(closing)?;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        Ok(self.sink.finish()?)
    }

    fn bytes_written(&self) -> u64 {
        self.sink.bytes_written()
    }
}

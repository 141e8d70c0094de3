//! Compliance export of audit trails.
//!
//! An [`ExportWriter`] serializes entries as JSON Lines, a JSON array or
//! CSV, optionally gzip-compressed. [`AuditExporter`] runs a filtered
//! query through the recorder and streams the result into a writer.

mod csv_export;
mod export;
mod exporter;
mod json_export;
mod sink;

pub use csv_export::CsvExporter;
pub use export::{
    ExportConfig, ExportError, ExportFormat, ExportProgress, ExportResult, ExportWriter,
    ProgressCallback, COLUMNS,
};
pub use exporter::{write_entries, AuditExporter, ExportSummary};
pub use json_export::{JsonLinesExporter, JsonPrettyExporter};

/// Create an export writer for the given format and configuration.
pub fn create_exporter<W: std::io::Write + Send + 'static>(
    writer: W,
    config: ExportConfig,
) -> ExportResult<Box<dyn ExportWriter>> {
    config.validate()?;
    let boxed: Box<dyn ExportWriter> = match config.format {
        ExportFormat::JsonLines => Box::new(JsonLinesExporter::new(writer, config)),
        ExportFormat::JsonPretty => Box::new(JsonPrettyExporter::new(writer, config)),
        ExportFormat::Csv => Box::new(CsvExporter::new(writer, config)),
    };
    Ok(boxed)
}

//! Query-then-write export driver.

use crate::export::{ExportConfig, ExportProgress, ExportResult, ExportWriter, ProgressCallback};
use crate::create_exporter;
use hrms_audit_recorder::AuditRecorder;
use hrms_audit_types::{AuditLogEntry, AuditQueryFilter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Outcome of a finished export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub entries: u64,
    pub bytes_written: u64,
}

/// Write `entries` through `writer`, reporting progress every `interval`
/// entries and once at the end.
pub fn write_entries(
    writer: &mut dyn ExportWriter,
    entries: &[AuditLogEntry],
    progress: Option<&ProgressCallback>,
    interval: u64,
) -> ExportResult<ExportSummary> {
    let total = entries.len() as u64;
    let interval = interval.max(1);

    writer.write_header()?;
    for (i, entry) in entries.iter().enumerate() {
        writer.write_entry(entry)?;
        let exported = i as u64 + 1;
        if let Some(report) = progress {
            if exported % interval == 0 && exported < total {
                report(ExportProgress::new(exported, Some(total), writer.bytes_written()));
            }
        }
    }
    writer.write_footer()?;
    writer.finish()?;

    let summary = ExportSummary {
        entries: total,
        bytes_written: writer.bytes_written(),
    };
    if let Some(report) = progress {
        report(ExportProgress::new(total, Some(total), summary.bytes_written));
    }
    Ok(summary)
}

/// Exports filtered audit trails from a recorder.
pub struct AuditExporter {
    recorder: AuditRecorder,
    config: ExportConfig,
    progress: Option<ProgressCallback>,
    progress_interval: u64,
}

impl AuditExporter {
    pub fn new(recorder: AuditRecorder, config: ExportConfig) -> Self {
        Self {
            recorder,
            config,
            progress: None,
            progress_interval: 1000,
        }
    }

    /// Report progress every `interval` entries.
    pub fn with_progress(mut self, interval: u64, callback: ProgressCallback) -> Self {
        self.progress_interval = interval;
        self.progress = Some(callback);
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Query with `filter` and write the result, newest first, to `out`.
    pub async fn export<W>(&self, filter: &AuditQueryFilter, out: W) -> ExportResult<ExportSummary>
    where
        W: Write + Send + 'static,
    {
        let mut writer = create_exporter(out, self.config.clone())?;
        let entries = self.recorder.query(filter).await?;
        let summary = write_entries(
            writer.as_mut(),
            &entries,
            self.progress.as_ref(),
            self.progress_interval,
        )?;

        info!(
            format = ?self.config.format,
            compressed = self.config.compress,
            entries = summary.entries,
            bytes = summary.bytes_written,
            "audit export complete"
        );
        Ok(summary)
    }

    /// Export into a new file at `path`.
    pub async fn export_to_file(
        &self,
        filter: &AuditQueryFilter,
        path: impl AsRef<Path>,
    ) -> ExportResult<ExportSummary> {
        let file = File::create(path.as_ref())?;
        self.export(filter, BufWriter::new(file)).await
    }
}

//! Persists a crawl result, falling back to CSV when the workbook write fails.

use std::path::{Path, PathBuf};

use dirscout_core::CrawlResult;

use crate::error::ExportError;
use crate::sink::{CsvSink, OutputFormat, TableSink, XlsxSink};

/// What [`ReportWriter::write`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The crawl produced no records; no file was touched.
    NothingToWrite,
    Written {
        path: PathBuf,
        format: OutputFormat,
        rows: usize,
        /// `true` when the primary format failed and the fallback was used.
        fell_back: bool,
    },
}

pub struct ReportWriter {
    primary: Box<dyn TableSink>,
    fallback: Box<dyn TableSink>,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::with_sinks(Box::new(XlsxSink), Box::new(CsvSink))
    }
}

impl ReportWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sinks(primary: Box<dyn TableSink>, fallback: Box<dyn TableSink>) -> Self {
        Self { primary, fallback }
    }

    /// Writes `result.records` next to `output`, using each sink's own
    /// extension. The primary sink is tried first; on failure the fallback
    /// gets the same rows.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::CreateDir`] if the parent directory cannot be
    /// created, or [`ExportError::Unwritable`] if both sinks fail.
    pub fn write(&self, result: &CrawlResult, output: &Path) -> Result<WriteOutcome, ExportError> {
        let records = &result.records;
        if records.is_empty() {
            tracing::warn!("crawl produced no records; nothing written");
            return Ok(WriteOutcome::NothingToWrite);
        }

        ensure_parent_dir(output)?;

        let primary_path = output.with_extension(self.primary.format().extension());
        let primary_err = match self.primary.write(records, &primary_path) {
            Ok(()) => {
                return Ok(written(
                    primary_path,
                    self.primary.format(),
                    records.len(),
                    false,
                ))
            }
            Err(e) => e,
        };
        tracing::warn!(
            error = %primary_err,
            fallback = %self.fallback.format(),
            "primary export failed; trying fallback"
        );

        let fallback_path = output.with_extension(self.fallback.format().extension());
        match self.fallback.write(records, &fallback_path) {
            Ok(()) => Ok(written(
                fallback_path,
                self.fallback.format(),
                records.len(),
                true,
            )),
            Err(fallback_err) => Err(ExportError::Unwritable {
                rows: records.len(),
                primary: Box::new(primary_err),
                fallback: Box::new(fallback_err),
            }),
        }
    }
}

fn written(path: PathBuf, format: OutputFormat, rows: usize, fell_back: bool) -> WriteOutcome {
    tracing::info!(path = %path.display(), %format, rows, fell_back, "report written");
    WriteOutcome::Written {
        path,
        format,
        rows,
        fell_back,
    }
}

fn ensure_parent_dir(output: &Path) -> Result<(), ExportError> {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
                path: dir.display().to_string(),
                source,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;

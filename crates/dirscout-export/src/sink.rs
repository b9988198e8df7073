//! Table serializers. Each writes the fixed column layout to one file.

use std::path::Path;

use dirscout_core::{EnrichedRecord, COLUMNS};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xlsx => write!(f, "XLSX"),
            Self::Csv => write!(f, "CSV"),
        }
    }
}

/// Writes a header row plus one row per record to `path`.
pub trait TableSink: Send + Sync {
    fn format(&self) -> OutputFormat;

    /// # Errors
    ///
    /// Returns [`ExportError`] if the file cannot be written.
    fn write(&self, records: &[EnrichedRecord], path: &Path) -> Result<(), ExportError>;
}

/// Excel workbook, one sheet. Lossless for non-Latin text.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSink;

impl XlsxSink {
    fn build(records: &[EnrichedRecord], path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name("stores")?;

        for (col, name) in (0u16..).zip(COLUMNS) {
            sheet.write_string_with_format(0, col, name, &header)?;
        }
        for (row, record) in (1u32..).zip(records) {
            for (col, value) in (0u16..).zip(record.row()) {
                if !value.is_empty() {
                    sheet.write_string(row, col, value)?;
                }
            }
        }
        sheet.set_freeze_panes(1, 0)?;

        workbook.save(path)
    }
}

impl TableSink for XlsxSink {
    fn format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn write(&self, records: &[EnrichedRecord], path: &Path) -> Result<(), ExportError> {
        Self::build(records, path).map_err(|source| ExportError::Xlsx {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Plain comma-separated UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvSink;

impl CsvSink {
    fn build(records: &[EnrichedRecord], path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(COLUMNS)?;
        for record in records {
            writer.write_record(record.row())?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl TableSink for CsvSink {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write(&self, records: &[EnrichedRecord], path: &Path) -> Result<(), ExportError> {
        Self::build(records, path).map_err(|source| ExportError::Csv {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, phone: &str) -> EnrichedRecord {
        EnrichedRecord {
            name: name.to_string(),
            category: "中正區".to_string(),
            detail_url: "https://dococar.com/detailing/1".to_string(),
            phone: phone.to_string(),
            rating: String::new(),
            review_count: String::new(),
            address: "台北市中正區, 忠孝西路".to_string(),
        }
    }

    #[test]
    fn csv_has_header_and_quoted_multibyte_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.csv");
        CsvSink
            .write(&[record("晶亮汽車美容", "02-2345-6789"), record("鍍膜專家", "")], &path)
            .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, COLUMNS);
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "晶亮汽車美容");
        assert_eq!(&rows[0][3], "02-2345-6789");
        assert_eq!(&rows[0][6], "台北市中正區, 忠孝西路");
        assert_eq!(&rows[1][3], "");
    }

    #[test]
    fn xlsx_writes_a_zip_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.xlsx");
        XlsxSink.write(&[record("晶亮汽車美容", "02-2345-6789")], &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"), "xlsx should be a zip archive");
    }

    #[test]
    fn xlsx_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/stores.xlsx");
        let err = XlsxSink.write(&[record("a", "")], &path).unwrap_err();
        assert!(matches!(err, ExportError::Xlsx { .. }));
    }

    #[test]
    fn extensions() {
        assert_eq!(OutputFormat::Xlsx.extension(), "xlsx");
        assert_eq!(OutputFormat::Csv.extension(), "csv");
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("XLSX write to {path} failed: {source}")]
    Xlsx {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("CSV write to {path} failed: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Both the primary and the fallback format failed. The crawl produced
    /// data that could not be saved.
    #[error("could not save {rows} records ({primary}); fallback also failed ({fallback})")]
    Unwritable {
        rows: usize,
        primary: Box<ExportError>,
        fallback: Box<ExportError>,
    },
}

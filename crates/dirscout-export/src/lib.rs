pub mod error;
pub mod sink;
pub mod summary;
pub mod writer;

pub use error::ExportError;
pub use sink::{CsvSink, OutputFormat, TableSink, XlsxSink};
pub use summary::RunSummary;
pub use writer::{ReportWriter, WriteOutcome};

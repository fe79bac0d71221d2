// Dataset ingestion: CSV upload parsing and column-level insight summaries.
// Everything here is pure and synchronous; handlers live in `handlers.rs`.

pub mod csv;
pub mod handlers;
pub mod insights;
pub mod upload;

pub use csv::{parse_csv_upload, CsvError, ParsedRow};
pub use insights::{analyze_rows, CsvInsight};

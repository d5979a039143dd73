//! Student records - typed cells, rows and tables, plus ingestion helpers.

pub mod ingest;
pub mod models;

pub use ingest::{ExtractedTable, IngestError, SourceKind};
pub use models::{CellValue, Record, RecordSet, RecordSetError};

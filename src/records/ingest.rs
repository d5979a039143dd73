//! Turning already-extracted tables into a `RecordSet`.
//!
//! File parsing itself (spreadsheets, PDF table scraping) happens outside this
//! crate; what arrives here is rows of cells.

use std::collections::HashSet;
use std::str::FromStr;

use super::models::{CellValue, RecordSet, RecordSetError};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("Unsupported file type '{0}'. Please upload a PDF or Excel file.")]
    UnsupportedSource(String),
    #[error("no table found in the uploaded document")]
    NoTable,
    #[error(transparent)]
    Malformed(#[from] RecordSetError),
}

/// Where a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Spreadsheet,
    Pdf,
}

impl FromStr for SourceKind {
    type Err = IngestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "spreadsheet" => Ok(Self::Spreadsheet),
            "pdf" => Ok(Self::Pdf),
            other => Err(IngestError::UnsupportedSource(other.to_string())),
        }
    }
}

/// One page worth of table rows as a PDF extractor returns them; row 0 is the header.
pub type ExtractedTable = Vec<Vec<Option<String>>>;

/// Spreadsheet-style input: a header plus JSON cells.
pub fn from_json_rows(
    columns: Vec<String>,
    rows: Vec<Vec<serde_json::Value>>,
) -> Result<RecordSet, IngestError> {
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(CellValue::from).collect())
        .collect();
    Ok(RecordSet::new(columns, rows)?)
}

/// Merges the tables of every page into one set.
///
/// The header comes from the first page that has a table; the first row of every
/// page is treated as a repeated header and skipped. Pages without rows are ignored.
pub fn from_extracted_pages(pages: &[ExtractedTable]) -> Result<RecordSet, IngestError> {
    let mut tables = pages.iter().filter(|table| !table.is_empty());
    let first = tables.next().ok_or(IngestError::NoTable)?;
    let columns = sanitize_header(&first[0]);

    let rows = std::iter::once(first)
        .chain(tables)
        .flat_map(|table| table.iter().skip(1))
        .map(|row| row.iter().cloned().map(CellValue::from).collect())
        .collect();

    Ok(RecordSet::new(columns, rows)?)
}

/// Blank header cells become `Column_{i}`; a repeated name gets `_{i}` appended.
pub fn sanitize_header(raw: &[Option<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(i, cell)| {
            let mut name = match cell.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => format!("Column_{i}"),
            };
            if seen.contains(&name) {
                name = format!("{name}_{i}");
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

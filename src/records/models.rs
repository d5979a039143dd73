use serde::{Serialize, Serializer};
use std::fmt;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Empty cells and whitespace-only text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Numeric coercion. Accepts finite numbers and text holding an integer or decimal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Number(value) => value.is_finite().then_some(*value),
            Self::Text(text) => parse_decimal(text.trim()),
        }
    }
}

/// Only plain decimal notation is accepted, so "inf" and "NaN" stay non-numeric.
fn parse_decimal(text: &str) -> Option<f64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    let looks_numeric = !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !looks_numeric {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Number(value) => serializer.serialize_f64(*value),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map(Self::Text).unwrap_or(Self::Empty)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Empty,
            Value::Number(number) => number.as_f64().map(Self::Number).unwrap_or(Self::Empty),
            Value::String(text) => Self::Text(text),
            other => Self::Text(other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordSetError {
    #[error("row {row} has {found} cells but the header declares {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rows of cells under one declared column list.
///
/// Column names are not required to be unique; duplicates are a validation
/// finding, not a construction error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, RecordSetError> {
        let expected = columns.len();
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(RecordSetError::RaggedRow {
                row,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of the first column called `name`, top to bottom.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// First record whose `column` cell displays as `identifier`.
    pub fn find_by_identifier(&self, column: &str, identifier: &str) -> Option<Record<'_>> {
        let wanted = identifier.trim();
        self.records().find(|record| {
            record
                .get(column)
                .is_some_and(|cell| cell.to_string().trim() == wanted)
        })
    }

    /// Drops rows whose `column` cell is blank. A missing column leaves the set untouched.
    pub fn retain_identified(mut self, column: &str) -> Self {
        if let Some(index) = self.column_index(column) {
            self.rows.retain(|row| !row[index].is_blank());
        }
        self
    }

    /// Copy of the set with every column called `name` removed.
    pub fn without_column(&self, name: &str) -> Self {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| self.columns[i] != name)
            .collect();
        Self {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [CellValue],
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let values = self.values;
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|index| &values[index])
    }

    /// Display text of a cell, or an empty string when the column is absent.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(ToString::to_string).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn is_blank(&self) -> bool {
        self.values.iter().all(CellValue::is_blank)
    }
}

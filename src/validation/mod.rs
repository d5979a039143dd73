//! Record validator.
//!
//! Runs a fixed list of independent checks over a whole `RecordSet`. Every check
//! runs even when an earlier one found problems, and findings keep check order:
//!
//! 1. duplicate column names
//! 2. missing required columns
//! 3. missing subject columns
//! 4. blank identifiers
//! 5. no non-blank rows at all
//! 6. non-numeric subject marks

pub mod issue;

use std::collections::HashSet;
use std::sync::Arc;

use log::warn;

use crate::records::RecordSet;
use crate::schema::Schema;

pub use issue::{IssueKind, ValidationIssue, ValidationResult};

pub struct Validator {
    schema: Arc<Schema>,
}

impl Validator {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates `records`; `subject_columns` overrides the schema's subjects when non-empty.
    pub fn validate(
        &self,
        records: &RecordSet,
        subject_columns: Option<&[String]>,
    ) -> ValidationResult {
        let subjects = self.schema.resolve_subjects(subject_columns);
        let identifier = self.schema.identifier_column();

        let mut result = ValidationResult::new();
        result.extend(check_duplicate_columns(records));
        result.extend(check_required_columns(records, self.schema.required_columns()));
        result.extend(check_subject_columns(records, subjects));
        result.extend(check_missing_identifiers(records, identifier));
        result.extend(check_empty_rows(records));
        result.extend(check_numeric_marks(records, subjects));

        if !result.is_ok() {
            warn!("Validation issues found:");
            for issue in result.issues() {
                warn!(" - {}", issue);
            }
        }

        result
    }
}

fn check_duplicate_columns(records: &RecordSet) -> Option<ValidationIssue> {
    let mut seen = HashSet::new();
    let duplicated = records.columns().iter().any(|c| !seen.insert(c.as_str()));
    duplicated.then_some(ValidationIssue::DuplicateColumns)
}

fn check_required_columns(records: &RecordSet, required: &[String]) -> Vec<ValidationIssue> {
    required
        .iter()
        .filter(|column| !records.has_column(column))
        .map(|column| ValidationIssue::MissingRequiredColumn(column.clone()))
        .collect()
}

fn check_subject_columns(records: &RecordSet, subjects: &[String]) -> Option<ValidationIssue> {
    let missing: Vec<String> = subjects
        .iter()
        .filter(|subject| !records.has_column(subject))
        .cloned()
        .collect();
    (!missing.is_empty()).then_some(ValidationIssue::MissingSubjectColumns(missing))
}

/// Absent identifier column is already reported as a missing required column.
fn check_missing_identifiers(records: &RecordSet, identifier: &str) -> Option<ValidationIssue> {
    let mut cells = records.column_values(identifier)?;
    cells
        .any(|cell| cell.is_blank())
        .then(|| ValidationIssue::MissingIdentifiers {
            column: identifier.to_string(),
        })
}

fn check_empty_rows(records: &RecordSet) -> Option<ValidationIssue> {
    let all_blank = records.records().all(|record| record.is_blank());
    all_blank.then_some(ValidationIssue::AllRowsEmpty)
}

/// One finding per subject column, however many cells in it are bad. Blank cells fail.
fn check_numeric_marks(records: &RecordSet, subjects: &[String]) -> Vec<ValidationIssue> {
    subjects
        .iter()
        .filter_map(|subject| {
            let mut cells = records.column_values(subject)?;
            cells
                .any(|cell| cell.as_number().is_none())
                .then(|| ValidationIssue::NonNumericMarks {
                    subject: subject.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::CellValue;

    fn validator() -> Validator {
        Validator::new(Arc::new(Schema::default()))
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_duplicate_columns_reported_once() {
        let set = RecordSet::new(columns(&["Math", "Math", "Math", "Science", "Science"]), vec![])
            .unwrap();
        assert_eq!(check_duplicate_columns(&set), Some(ValidationIssue::DuplicateColumns));
    }

    #[test]
    fn test_zero_rows_counts_as_all_empty() {
        let set = RecordSet::new(columns(&["Roll No"]), vec![]).unwrap();
        assert_eq!(check_empty_rows(&set), Some(ValidationIssue::AllRowsEmpty));
    }

    #[test]
    fn test_missing_identifier_skipped_without_column() {
        let set = RecordSet::new(columns(&["Math"]), vec![vec![CellValue::Empty]]).unwrap();
        assert_eq!(check_missing_identifiers(&set, "Roll No"), None);
    }

    #[test]
    fn test_blank_text_identifier_is_missing() {
        let set = RecordSet::new(columns(&["Roll No"]), vec![vec![" ".into()]]).unwrap();
        assert_eq!(
            check_missing_identifiers(&set, "Roll No"),
            Some(ValidationIssue::MissingIdentifiers {
                column: "Roll No".into()
            })
        );
    }

    #[test]
    fn test_empty_table_degrades_to_issues() {
        let result = validator().validate(&RecordSet::default(), None);
        assert_eq!(
            result.messages(),
            vec![
                "Missing required column: Roll No",
                "Missing required column: Student Name",
                "Missing required column: Class",
                "Missing required column: Section",
                "Missing subject columns: Math, Science, English, Social Studies, Punjabi",
                "All rows are empty.",
            ]
        );
    }

    #[test]
    fn test_issue_kinds() {
        assert_eq!(ValidationIssue::DuplicateColumns.kind(), IssueKind::Structural);
        assert_eq!(
            ValidationIssue::NonNumericMarks {
                subject: "Math".into()
            }
            .kind(),
            IssueKind::RowLevel
        );
    }

    #[test]
    fn test_report_numbering() {
        let mut result = ValidationResult::new();
        result.add(ValidationIssue::AllRowsEmpty);
        result.add(ValidationIssue::MissingRequiredColumn("Class".into()));
        let report = result.to_report();
        assert!(report.contains("2 issue(s)"));
        assert!(report.contains("1. All rows are empty."));
        assert!(report.contains("2. Missing required column: Class"));
        assert_eq!(ValidationResult::new().to_report(), "");
    }
}

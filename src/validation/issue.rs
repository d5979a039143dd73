//! Validation findings and the result collection returned by the validator.

use std::fmt;

/// Whether a finding concerns the table layout or individual cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Structural,
    RowLevel,
}

/// One data-quality finding. `Display` yields the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    DuplicateColumns,
    MissingRequiredColumn(String),
    /// Every missing subject, in declaration order.
    MissingSubjectColumns(Vec<String>),
    MissingIdentifiers { column: String },
    AllRowsEmpty,
    NonNumericMarks { subject: String },
}

impl ValidationIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::DuplicateColumns
            | Self::MissingRequiredColumn(_)
            | Self::MissingSubjectColumns(_)
            | Self::AllRowsEmpty => IssueKind::Structural,
            Self::MissingIdentifiers { .. } | Self::NonNumericMarks { .. } => IssueKind::RowLevel,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumns => f.write_str("Duplicate column names found."),
            Self::MissingRequiredColumn(column) => {
                write!(f, "Missing required column: {column}")
            }
            Self::MissingSubjectColumns(subjects) => {
                write!(f, "Missing subject columns: {}", subjects.join(", "))
            }
            Self::MissingIdentifiers { column } => write!(f, "Some rows have missing {column}."),
            Self::AllRowsEmpty => f.write_str("All rows are empty."),
            Self::NonNumericMarks { subject } => {
                write!(f, "Non-numeric marks found in {subject}")
            }
        }
    }
}

/// Ordered findings of one validation run. `ok` means no findings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Numbered summary suitable for a single error message.
    pub fn to_report(&self) -> String {
        if self.issues.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} issue(s) found",
            self.issues.len()
        )];
        for (i, issue) in self.issues.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, issue));
        }
        parts.join("\n")
    }
}

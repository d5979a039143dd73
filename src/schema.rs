//! Schema registry - column names and grade bands for student records.
//!
//! Everything here is plain data. A `Schema` is built once, wrapped in an `Arc`
//! and handed to the validator and the deriver; nothing mutates it afterwards.

use serde::Serialize;

pub const ROLL_NO_COLUMN: &str = "Roll No";
pub const STUDENT_NAME_COLUMN: &str = "Student Name";
pub const CLASS_COLUMN: &str = "Class";
pub const SECTION_COLUMN: &str = "Section";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    ROLL_NO_COLUMN,
    STUDENT_NAME_COLUMN,
    CLASS_COLUMN,
    SECTION_COLUMN,
];

pub const DEFAULT_SUBJECT_COLUMNS: [&str; 5] =
    ["Math", "Science", "English", "Social Studies", "Punjabi"];

/// Returned wherever a mark cannot be coerced to a number.
pub const INVALID_SENTINEL: &str = "Invalid";

/// One `(lower bound, letter)` pair. The bound is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeBand {
    pub lower_bound: f64,
    pub letter: String,
}

impl GradeBand {
    pub fn new(lower_bound: f64, letter: impl Into<String>) -> Self {
        Self {
            lower_bound,
            letter: letter.into(),
        }
    }
}

/// Ordered grade bands plus the letter used below the lowest band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeScale {
    bands: Vec<GradeBand>,
    fallback: String,
}

impl GradeScale {
    /// Bands may be given in any order; they are kept sorted by descending bound.
    pub fn new(mut bands: Vec<GradeBand>, fallback: impl Into<String>) -> Self {
        bands.sort_by(|a, b| b.lower_bound.total_cmp(&a.lower_bound));
        Self {
            bands,
            fallback: fallback.into(),
        }
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// First band whose lower bound is <= `value` wins.
    pub fn letter_for(&self, value: f64) -> &str {
        self.bands
            .iter()
            .find(|band| value >= band.lower_bound)
            .map(|band| band.letter.as_str())
            .unwrap_or(&self.fallback)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::new(
            vec![
                GradeBand::new(91.0, "A+"),
                GradeBand::new(81.0, "A"),
                GradeBand::new(71.0, "B+"),
                GradeBand::new(61.0, "B"),
                GradeBand::new(51.0, "C"),
                GradeBand::new(41.0, "D"),
            ],
            "F",
        )
    }
}

/// Column layout and grading rules for one batch of student records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    identifier_column: String,
    name_column: String,
    required_columns: Vec<String>,
    subject_columns: Vec<String>,
    grade_scale: GradeScale,
}

impl Schema {
    pub fn new(
        identifier_column: impl Into<String>,
        name_column: impl Into<String>,
        required_columns: Vec<String>,
        subject_columns: Vec<String>,
        grade_scale: GradeScale,
    ) -> Self {
        Self {
            identifier_column: identifier_column.into(),
            name_column: name_column.into(),
            required_columns,
            subject_columns,
            grade_scale,
        }
    }

    /// Same schema with a different subject column set.
    pub fn with_subject_columns(mut self, subject_columns: Vec<String>) -> Self {
        self.subject_columns = subject_columns;
        self
    }

    pub fn identifier_column(&self) -> &str {
        &self.identifier_column
    }

    pub fn name_column(&self) -> &str {
        &self.name_column
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required_columns
    }

    pub fn subject_columns(&self) -> &[String] {
        &self.subject_columns
    }

    pub fn grade_scale(&self) -> &GradeScale {
        &self.grade_scale
    }

    /// Picks the per-call override when it is non-empty, otherwise the schema's own set.
    pub fn resolve_subjects<'a>(&'a self, subject_columns: Option<&'a [String]>) -> &'a [String] {
        match subject_columns {
            Some(subjects) if !subjects.is_empty() => subjects,
            _ => &self.subject_columns,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(
            ROLL_NO_COLUMN,
            STUDENT_NAME_COLUMN,
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            DEFAULT_SUBJECT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            GradeScale::default(),
        )
    }
}

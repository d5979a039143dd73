//! Field deriver - display fields computed from one student record.
//!
//! All functions are pure. Coercion failures never error; they come back as the
//! `"Invalid"` sentinel so one bad cell cannot abort a batch.

pub mod words;

use std::sync::Arc;

use serde::Serialize;

use crate::records::{CellValue, Record};
use crate::schema::{Schema, INVALID_SENTINEL};

/// Trims and title-cases a name: "  john DOE " -> "John Doe".
pub fn format_name(raw: &str) -> String {
    let mut formatted = String::with_capacity(raw.len());
    let mut previous_is_letter = false;
    for ch in raw.trim().chars() {
        if previous_is_letter {
            formatted.extend(ch.to_lowercase());
        } else {
            formatted.extend(ch.to_uppercase());
        }
        previous_is_letter = ch.is_alphabetic();
    }
    formatted
}

/// Marks spelled as English words, or `"Invalid"` when the cell is not numeric.
pub fn marks_in_words(marks: &CellValue) -> String {
    marks
        .as_number()
        .and_then(words::cardinal)
        .unwrap_or_else(|| INVALID_SENTINEL.to_string())
}

/// A raw column with its display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectMark {
    pub subject: String,
    pub marks: String,
    pub grade: String,
    pub marks_in_words: String,
}

/// Everything a DMC template needs for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    pub fields: Vec<DisplayField>,
    pub identifier: String,
    pub formatted_name: String,
    pub subjects: Vec<SubjectMark>,
    /// Present only when every subject mark is numeric.
    pub total_marks: Option<f64>,
    pub overall_grade: String,
    pub qr_payload: String,
}

impl DerivedRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Base name for rendered output, e.g. `DMC_17`.
    pub fn output_name(&self) -> String {
        format!("DMC_{}", self.identifier)
    }
}

pub struct Deriver {
    schema: Arc<Schema>,
}

impl Deriver {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// Letter grade from the schema's scale, or `"Invalid"` when the cell is not numeric.
    pub fn grade_of(&self, marks: &CellValue) -> String {
        match marks.as_number() {
            Some(value) => self.schema.grade_scale().letter_for(value).to_string(),
            None => INVALID_SENTINEL.to_string(),
        }
    }

    pub fn qr_payload_for(&self, record: &Record<'_>) -> String {
        format!(
            "Roll No: {}, Name: {}",
            record.text(self.schema.identifier_column()),
            record.text(self.schema.name_column())
        )
    }

    pub fn derive(&self, record: &Record<'_>, subject_columns: Option<&[String]>) -> DerivedRecord {
        let subjects = self.schema.resolve_subjects(subject_columns);

        let marks: Vec<(&String, CellValue)> = subjects
            .iter()
            .map(|subject| (subject, record.get(subject).cloned().unwrap_or(CellValue::Empty)))
            .collect();

        let numeric: Option<Vec<f64>> = marks.iter().map(|(_, cell)| cell.as_number()).collect();
        let total_marks = numeric
            .filter(|values| !values.is_empty())
            .map(|values| values.iter().sum::<f64>());
        let overall_grade = match total_marks {
            Some(total) => self
                .schema
                .grade_scale()
                .letter_for(total / subjects.len() as f64)
                .to_string(),
            None => INVALID_SENTINEL.to_string(),
        };

        DerivedRecord {
            fields: record
                .fields()
                .map(|(name, value)| DisplayField {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            identifier: record.text(self.schema.identifier_column()).trim().to_string(),
            formatted_name: format_name(&record.text(self.schema.name_column())),
            subjects: marks
                .iter()
                .map(|(subject, cell)| SubjectMark {
                    subject: subject.to_string(),
                    marks: cell.to_string(),
                    grade: self.grade_of(cell),
                    marks_in_words: marks_in_words(cell),
                })
                .collect(),
            total_marks,
            overall_grade,
            qr_payload: self.qr_payload_for(record),
        }
    }
}

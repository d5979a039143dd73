//! Common utilities for DMC rendering.
//!
//! Shared helpers for template filling, escaping and dates.

use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::derive::DerivedRecord;
use crate::schema::{CLASS_COLUMN, SECTION_COLUMN};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
        .expect("placeholder pattern is valid");
}

/// Today's date for the DMC footer (e.g., "18 October 2026").
pub fn format_issue_date() -> String {
    format_date(Local::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Replaces `{{ key }}` markers with `values[key]`; unknown keys render as nothing.
///
/// Values are inserted verbatim, so callers escape them for the target format first.
pub fn fill_placeholders(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Makes an output name safe to use as a file stem.
pub fn safe_file_stem(name: &str) -> String {
    let cleaned = sanitize_filename::sanitize(name.trim());
    if cleaned.is_empty() {
        "DMC_unknown".to_string()
    } else {
        cleaned
    }
}

/// Default template directory shipped with the crate.
pub fn default_template_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
}

/// Scalar placeholders shared by every DMC template, escaped with `escape`.
pub fn scalar_values(
    record: &DerivedRecord,
    issue_date: &str,
    escape: fn(&str) -> String,
) -> HashMap<&'static str, String> {
    let mut values = HashMap::new();
    values.insert("name", escape(&record.formatted_name));
    values.insert("roll_no", escape(&record.identifier));
    values.insert("class", escape(record.field(CLASS_COLUMN).unwrap_or_default()));
    values.insert("section", escape(record.field(SECTION_COLUMN).unwrap_or_default()));
    values.insert(
        "total",
        escape(
            &record
                .total_marks
                .map(|total| total.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
    );
    values.insert("overall_grade", escape(&record.overall_grade));
    values.insert("issue_date", escape(issue_date));
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_placeholders() {
        let mut values = HashMap::new();
        values.insert("name", "Asha".to_string());
        let filled = fill_placeholders("Hello {{name}}, {{ name }}! {{missing}}.", &values);
        assert_eq!(filled, "Hello Asha, Asha! .");
    }

    #[test]
    fn test_fill_placeholders_leaves_other_braces() {
        let values = HashMap::new();
        assert_eq!(fill_placeholders("#let x = { 1 }", &values), "#let x = { 1 }");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date(date), "7 March 2026");
    }

    #[test]
    fn test_safe_file_stem() {
        assert_eq!(safe_file_stem("DMC_17"), "DMC_17");
        assert_eq!(safe_file_stem("DMC_a/b"), "DMC_ab");
        assert_eq!(safe_file_stem("   "), "DMC_unknown");
    }
}

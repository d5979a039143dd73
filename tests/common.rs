#![allow(dead_code)]

use dmc_generator::derive::DerivedRecord;
use dmc_generator::records::{CellValue, RecordSet};
use dmc_generator::render::{QrEncoder, QrError, RenderError, RenderedDocument, Renderer};

pub const FULL_COLUMNS: [&str; 9] = [
    "Roll No",
    "Student Name",
    "Class",
    "Section",
    "Math",
    "Science",
    "English",
    "Social Studies",
    "Punjabi",
];

pub fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// One fully valid student row for `FULL_COLUMNS`.
pub fn valid_row(roll_no: f64, name: &str) -> Vec<CellValue> {
    vec![
        roll_no.into(),
        name.into(),
        "10".into(),
        "A".into(),
        85.0.into(),
        90.0.into(),
        78.0.into(),
        88.0.into(),
        92.0.into(),
    ]
}

pub fn full_table(rows: Vec<Vec<CellValue>>) -> RecordSet {
    RecordSet::new(columns(&FULL_COLUMNS), rows).unwrap()
}

/// QR encoder returning the payload bytes, so tests can see what was encoded.
pub struct EchoQr;

impl QrEncoder for EchoQr {
    fn encode(&self, payload: &str) -> Result<Vec<u8>, QrError> {
        Ok(payload.as_bytes().to_vec())
    }
}

/// QR encoder that always fails.
pub struct BrokenQr;

impl QrEncoder for BrokenQr {
    fn encode(&self, _payload: &str) -> Result<Vec<u8>, QrError> {
        Err(QrError::EmptyOutput)
    }
}

/// Renderer writing `name|qr payload` as the document body.
/// Records whose identifier is listed in `fail_for` fail to render.
#[derive(Default)]
pub struct StubRenderer {
    pub fail_for: Vec<String>,
}

impl StubRenderer {
    pub fn failing_for(identifiers: &[&str]) -> Self {
        Self {
            fail_for: identifiers.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl Renderer for StubRenderer {
    fn render(
        &self,
        record: &DerivedRecord,
        qr_png: &[u8],
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError> {
        if self.fail_for.contains(&record.identifier) {
            return Err(RenderError::TypstExit(1));
        }
        let body = format!(
            "{}|{}",
            record.formatted_name,
            String::from_utf8_lossy(qr_png)
        );
        Ok(RenderedDocument::new(
            format!("{}.pdf", output_name),
            body.into_bytes(),
        ))
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::generation::GenerationFailure;
use crate::records::{ingest, ExtractedTable, IngestError, RecordSet, SourceKind};
use crate::schema::Schema;

/// An uploaded student table.
///
/// Spreadsheets send `columns` plus `rows`; PDFs send the tables extracted from
/// every page in `pages`, each page starting with its header row.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TablePayload {
    /// `spreadsheet` (or `xlsx`) or `pdf`.
    pub source: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Vec<Vec<Object>>)]
    pub rows: Vec<Vec<Value>>,
    #[serde(default)]
    #[schema(value_type = Vec<Vec<Vec<Option<String>>>>)]
    pub pages: Vec<ExtractedTable>,
}

impl TablePayload {
    pub fn into_record_set(self) -> Result<RecordSet, IngestError> {
        match self.source.parse::<SourceKind>()? {
            SourceKind::Spreadsheet => ingest::from_json_rows(self.columns, self.rows),
            SourceKind::Pdf => ingest::from_extracted_pages(&self.pages),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateRequest {
    pub table: TablePayload,
    pub subject_columns: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    pub ok: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PreviewRequest {
    pub table: TablePayload,
    pub roll_no: String,
    pub subject_columns: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub table: TablePayload,
    /// Download a single DMC instead of generating the whole batch.
    pub roll_no: Option<String>,
    pub subject_columns: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FailureEntry {
    pub roll_no: String,
    pub reason: String,
}

impl From<&GenerationFailure> for FailureEntry {
    fn from(failure: &GenerationFailure) -> Self {
        Self {
            roll_no: failure.identifier.clone(),
            reason: failure.reason.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    pub batch_id: Uuid,
    pub output_dir: String,
    pub generated: Vec<String>,
    pub failures: Vec<FailureEntry>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GradeBandResponse {
    pub lower_bound: f64,
    pub letter: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SchemaResponse {
    pub identifier_column: String,
    pub name_column: String,
    pub required_columns: Vec<String>,
    pub subject_columns: Vec<String>,
    pub grade_bands: Vec<GradeBandResponse>,
    pub fallback_grade: String,
}

impl From<&Schema> for SchemaResponse {
    fn from(schema: &Schema) -> Self {
        let scale = schema.grade_scale();
        Self {
            identifier_column: schema.identifier_column().to_string(),
            name_column: schema.name_column().to_string(),
            required_columns: schema.required_columns().to_vec(),
            subject_columns: schema.subject_columns().to_vec(),
            grade_bands: scale
                .bands()
                .iter()
                .map(|band| GradeBandResponse {
                    lower_bound: band.lower_bound,
                    letter: band.letter.clone(),
                })
                .collect(),
            fallback_grade: scale.fallback().to_string(),
        }
    }
}

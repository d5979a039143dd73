//! DMC generation pipeline: validate -> derive -> QR -> render.
//!
//! A whole table is validated first; only a clean table is rendered. Per-record
//! failures (QR or render) are collected and never stop the rest of the batch.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};
use thiserror::Error;

use crate::derive::Deriver;
use crate::records::{Record, RecordSet};
use crate::render::{QrEncoder, QrError, RenderError, RenderedDocument, Renderer};
use crate::schema::Schema;
use crate::validation::{ValidationResult, Validator};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{}", .0.to_report())]
    Invalid(ValidationResult),
    #[error("no record with {column} '{identifier}'")]
    RecordNotFound { column: String, identifier: String },
    #[error(transparent)]
    Record(#[from] GenerationFailure),
}

#[derive(Debug, Error)]
pub enum FailureReason {
    #[error("QR encoding failed: {0}")]
    Qr(#[from] QrError),
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("could not save document: {0}")]
    Write(#[source] std::io::Error),
    #[error("another record already produced {0}")]
    DuplicateOutput(String),
}

/// A single record that could not be turned into a document.
#[derive(Debug, Error)]
#[error("generation failed for record {identifier}: {reason}")]
pub struct GenerationFailure {
    pub identifier: String,
    #[source]
    pub reason: FailureReason,
}

/// Outcome of a batch run, in record order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<RenderedDocument>,
    pub failures: Vec<GenerationFailure>,
}

pub struct DmcPipeline {
    schema: Arc<Schema>,
    validator: Validator,
    deriver: Deriver,
    renderer: Box<dyn Renderer>,
    qr: Box<dyn QrEncoder>,
}

impl DmcPipeline {
    pub fn new(schema: Arc<Schema>, renderer: Box<dyn Renderer>, qr: Box<dyn QrEncoder>) -> Self {
        Self {
            validator: Validator::new(schema.clone()),
            deriver: Deriver::new(schema.clone()),
            schema,
            renderer,
            qr,
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn deriver(&self) -> &Deriver {
        &self.deriver
    }

    /// Derives, encodes and renders one record, naming the output `DMC_{identifier}`.
    pub fn generate_one(
        &self,
        record: &Record<'_>,
        subject_columns: Option<&[String]>,
    ) -> Result<RenderedDocument, GenerationFailure> {
        let derived = self.deriver.derive(record, subject_columns);
        let fail = |reason: FailureReason| GenerationFailure {
            identifier: derived.identifier.clone(),
            reason,
        };

        let qr_png = self
            .qr
            .encode(&derived.qr_payload)
            .map_err(|e| fail(e.into()))?;
        self.renderer
            .render(&derived, &qr_png, &derived.output_name())
            .map_err(|e| fail(e.into()))
    }

    /// Validates the table, then renders the record whose identifier matches.
    pub fn generate_for(
        &self,
        records: &RecordSet,
        identifier: &str,
        subject_columns: Option<&[String]>,
    ) -> Result<RenderedDocument, GenerationError> {
        self.ensure_valid(records, subject_columns)?;
        let column = self.schema.identifier_column();
        let record = records
            .find_by_identifier(column, identifier)
            .ok_or_else(|| GenerationError::RecordNotFound {
                column: column.to_string(),
                identifier: identifier.to_string(),
            })?;
        Ok(self.generate_one(&record, subject_columns)?)
    }

    /// Validates the table, then renders every record.
    pub fn generate_batch(
        &self,
        records: &RecordSet,
        subject_columns: Option<&[String]>,
    ) -> Result<BatchReport, GenerationError> {
        self.ensure_valid(records, subject_columns)?;

        let mut report = BatchReport::default();
        for record in records.records() {
            match self.generate_one(&record, subject_columns) {
                Ok(document) => report.documents.push(document),
                Err(failure) => {
                    error!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }
        info!(
            "DMC batch finished: {} generated, {} failed",
            report.documents.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Like `generate_batch`, but also saves each document into `output_dir`.
    /// A document that cannot be written, or whose filename an earlier record in
    /// the batch already used, becomes a failure entry. Existing files are never
    /// overwritten by a later record of the same batch.
    pub fn generate_batch_to_dir(
        &self,
        records: &RecordSet,
        subject_columns: Option<&[String]>,
        output_dir: &Path,
    ) -> Result<(BatchReport, Vec<PathBuf>), GenerationError> {
        let report = self.generate_batch(records, subject_columns)?;
        let mut saved = Vec::new();
        let mut used_names = HashSet::new();
        let mut kept = BatchReport {
            documents: Vec::new(),
            failures: report.failures,
        };

        for document in report.documents {
            if !used_names.insert(document.filename.clone()) {
                let failure = GenerationFailure {
                    identifier: identifier_from_filename(&document.filename),
                    reason: FailureReason::DuplicateOutput(document.filename.clone()),
                };
                error!("{}", failure);
                kept.failures.push(failure);
                continue;
            }
            match save_document(output_dir, &document) {
                Ok(path) => {
                    saved.push(path);
                    kept.documents.push(document);
                }
                Err(e) => {
                    let failure = GenerationFailure {
                        identifier: identifier_from_filename(&document.filename),
                        reason: FailureReason::Write(e),
                    };
                    error!("{}", failure);
                    kept.failures.push(failure);
                }
            }
        }
        Ok((kept, saved))
    }

    fn ensure_valid(
        &self,
        records: &RecordSet,
        subject_columns: Option<&[String]>,
    ) -> Result<(), GenerationError> {
        let result = self.validator.validate(records, subject_columns);
        if result.is_ok() {
            Ok(())
        } else {
            Err(GenerationError::Invalid(result))
        }
    }
}

/// Writes `document` into `output_dir`, creating the directory when needed.
pub fn save_document(output_dir: &Path, document: &RenderedDocument) -> std::io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&document.filename);
    fs::write(&path, &document.bytes)?;
    info!("DMC generated: {}", path.display());
    Ok(path)
}

fn identifier_from_filename(filename: &str) -> String {
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
    stem.strip_prefix("DMC_").unwrap_or(stem).to_string()
}

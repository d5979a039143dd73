use actix_web::error::BlockingError;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use uuid::Uuid;

use super::models::{
    FailureEntry, GenerateRequest, GenerateResponse, PreviewRequest, SchemaResponse,
    TablePayload, ValidateRequest, ValidationResponse,
};
use super::DmcState;
use crate::generation::GenerationError;
use crate::records::{IngestError, RecordSet};
use crate::render::RenderedDocument;
use crate::ErrorResponse;

impl From<IngestError> for HttpResponse {
    fn from(error: IngestError) -> Self {
        HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string()))
    }
}

impl From<GenerationError> for HttpResponse {
    fn from(error: GenerationError) -> Self {
        let message = error.to_string();
        match error {
            GenerationError::Invalid(result) => {
                HttpResponse::UnprocessableEntity().json(ValidationResponse {
                    ok: false,
                    issues: result.messages(),
                })
            }
            GenerationError::RecordNotFound { .. } => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(&message))
            }
            GenerationError::Record(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&message)),
        }
    }
}

fn blocking_failed(e: BlockingError) -> HttpResponse {
    error!("DMC worker failed: {}", e);
    HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
}

/// Parses the table and keeps only rows that carry a roll number.
fn load_identified(state: &DmcState, table: TablePayload) -> Result<RecordSet, IngestError> {
    Ok(table
        .into_record_set()?
        .retain_identified(state.schema.identifier_column()))
}

fn document_response(document: RenderedDocument, attachment: bool) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type(document.mime_type.as_str());
    if attachment {
        response.insert_header(ContentDisposition::attachment(document.filename.clone()));
    }
    response.body(document.bytes)
}

#[utoipa::path(
    get,
    path = "/api/schema",
    tag = "DMC",
    responses(
        (status = 200, description = "Columns and grade bands in use", body = SchemaResponse)
    )
)]
pub async fn get_schema(state: web::Data<DmcState>) -> impl Responder {
    HttpResponse::Ok().json(SchemaResponse::from(state.schema.as_ref()))
}

#[utoipa::path(
    post,
    path = "/api/records/validate",
    tag = "DMC",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation outcome", body = ValidationResponse),
        (status = 400, description = "Malformed table", body = ErrorResponse)
    )
)]
pub async fn validate_records(
    state: web::Data<DmcState>,
    body: web::Json<ValidateRequest>,
) -> HttpResponse {
    let ValidateRequest {
        table,
        subject_columns,
    } = body.into_inner();

    let records = match table.into_record_set() {
        Ok(records) => records,
        Err(e) => return e.into(),
    };

    let result = state
        .pdf
        .validator()
        .validate(&records, subject_columns.as_deref());
    HttpResponse::Ok().json(ValidationResponse {
        ok: result.is_ok(),
        issues: result.messages(),
    })
}

#[utoipa::path(
    post,
    path = "/api/dmc/preview",
    tag = "DMC",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "HTML DMC", body = String, content_type = "text/html"),
        (status = 400, description = "Malformed table", body = ErrorResponse),
        (status = 404, description = "Roll number not found", body = ErrorResponse),
        (status = 422, description = "Table failed validation", body = ValidationResponse)
    )
)]
pub async fn preview_dmc(
    state: web::Data<DmcState>,
    body: web::Json<PreviewRequest>,
) -> HttpResponse {
    let PreviewRequest {
        table,
        roll_no,
        subject_columns,
    } = body.into_inner();

    let records = match load_identified(&state, table) {
        Ok(records) => records,
        Err(e) => return e.into(),
    };

    let worker_state = state.clone();
    let result = web::block(move || {
        worker_state
            .preview
            .generate_for(&records, &roll_no, subject_columns.as_deref())
    })
    .await;

    match result {
        Ok(Ok(document)) => document_response(document, false),
        Ok(Err(e)) => e.into(),
        Err(e) => blocking_failed(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/dmc/generate",
    tag = "DMC",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "PDF for `roll_no`, or the batch report when it is omitted", body = GenerateResponse),
        (status = 400, description = "Malformed table", body = ErrorResponse),
        (status = 404, description = "Roll number not found", body = ErrorResponse),
        (status = 422, description = "Table failed validation", body = ValidationResponse)
    )
)]
pub async fn generate_dmc(
    state: web::Data<DmcState>,
    body: web::Json<GenerateRequest>,
) -> HttpResponse {
    let GenerateRequest {
        table,
        roll_no,
        subject_columns,
    } = body.into_inner();

    let records = match load_identified(&state, table) {
        Ok(records) => records,
        Err(e) => return e.into(),
    };

    match roll_no {
        Some(roll_no) => {
            let worker_state = state.clone();
            let result = web::block(move || {
                worker_state
                    .pdf
                    .generate_for(&records, &roll_no, subject_columns.as_deref())
            })
            .await;

            match result {
                Ok(Ok(document)) => document_response(document, true),
                Ok(Err(e)) => e.into(),
                Err(e) => blocking_failed(e),
            }
        }
        None => {
            let batch_id = Uuid::new_v4();
            let output_dir = state.config.output_dir.join(batch_id.to_string());
            info!(
                "Generating DMC batch {} into {}",
                batch_id,
                output_dir.display()
            );

            let worker_state = state.clone();
            let worker_dir = output_dir.clone();
            let result = web::block(move || {
                worker_state.pdf.generate_batch_to_dir(
                    &records,
                    subject_columns.as_deref(),
                    &worker_dir,
                )
            })
            .await;

            match result {
                Ok(Ok((report, _saved))) => HttpResponse::Ok().json(GenerateResponse {
                    batch_id,
                    output_dir: output_dir.display().to_string(),
                    generated: report
                        .documents
                        .iter()
                        .map(|document| document.filename.clone())
                        .collect(),
                    failures: report.failures.iter().map(FailureEntry::from).collect(),
                }),
                Ok(Err(e)) => e.into(),
                Err(e) => blocking_failed(e),
            }
        }
    }
}

use std::path::Path;
use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use super::models::{GenerateResponse, ValidationResponse};
use super::{config, DmcState};
use crate::config::AppConfig;
use crate::derive::DerivedRecord;
use crate::generation::DmcPipeline;
use crate::render::{
    HtmlDmcRenderer, QrEncoder, QrError, RenderError, RenderedDocument, Renderer,
};
use crate::schema::Schema;

struct EchoQr;

impl QrEncoder for EchoQr {
    fn encode(&self, payload: &str) -> Result<Vec<u8>, QrError> {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Fake PDF renderer that fails for one roll number.
struct StubPdf {
    fail_for: &'static str,
}

impl Renderer for StubPdf {
    fn render(
        &self,
        record: &DerivedRecord,
        _qr_png: &[u8],
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError> {
        if record.identifier == self.fail_for {
            return Err(RenderError::TypstExit(1));
        }
        Ok(RenderedDocument::new(
            format!("{}.pdf", output_name),
            record.formatted_name.clone().into_bytes(),
        ))
    }
}

fn test_state(output_dir: &Path) -> web::Data<DmcState> {
    let schema = Arc::new(Schema::default());
    let config = AppConfig {
        output_dir: output_dir.to_path_buf(),
        ..AppConfig::default()
    };
    let pdf = DmcPipeline::new(
        schema.clone(),
        Box::new(StubPdf { fail_for: "2" }),
        Box::new(EchoQr),
    );
    let preview = DmcPipeline::new(
        schema.clone(),
        Box::new(HtmlDmcRenderer::from_template("{{name}} #{{roll_no}}")),
        Box::new(EchoQr),
    );
    web::Data::new(DmcState::with_pipelines(config, schema, pdf, preview))
}

fn columns() -> Value {
    json!([
        "Roll No", "Student Name", "Class", "Section",
        "Math", "Science", "English", "Social Studies", "Punjabi"
    ])
}

fn table() -> Value {
    json!({
        "source": "spreadsheet",
        "columns": columns(),
        "rows": [
            [1, "asha KAUR", "10", "A", 85, 90, 78, 88, 92],
            [2, "ravi kumar", "10", "B", 65, 70, 72, 60, 55]
        ]
    })
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .service(web::scope("/api").configure(config)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_get_schema() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::get().uri("/api/schema").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["identifier_column"], "Roll No");
    assert_eq!(body["subject_columns"].as_array().unwrap().len(), 5);
    assert_eq!(body["grade_bands"][0]["letter"], "A+");
    assert_eq!(body["fallback_grade"], "F");
}

#[actix_web::test]
async fn test_validate_clean_table() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::post()
        .uri("/api/records/validate")
        .set_json(json!({ "table": table() }))
        .to_request();
    let body: ValidationResponse = test::call_and_read_body_json(&app, req).await;

    assert!(body.ok);
    assert!(body.issues.is_empty());
}

#[actix_web::test]
async fn test_validate_reports_issues() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let payload = json!({
        "table": {
            "source": "xlsx",
            "columns": ["Roll No", "Student Name", "Section", "Math"],
            "rows": [[1, "Asha", "A", "ninety"]]
        },
        "subject_columns": ["Math"]
    });
    let req = test::TestRequest::post()
        .uri("/api/records/validate")
        .set_json(payload)
        .to_request();
    let body: ValidationResponse = test::call_and_read_body_json(&app, req).await;

    assert!(!body.ok);
    assert_eq!(
        body.issues,
        vec![
            "Missing required column: Class".to_string(),
            "Non-numeric marks found in Math".to_string(),
        ]
    );
}

#[actix_web::test]
async fn test_validate_rejects_unsupported_source() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::post()
        .uri("/api/records/validate")
        .set_json(json!({ "table": { "source": "csv" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
    assert_eq!(
        body["message"],
        "Unsupported file type 'csv'. Please upload a PDF or Excel file."
    );
}

#[actix_web::test]
async fn test_validate_rejects_ragged_rows() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::post()
        .uri("/api/records/validate")
        .set_json(json!({
            "table": { "source": "spreadsheet", "columns": ["Roll No", "Class"], "rows": [[1]] }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_validate_pdf_pages() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let header = json!([
        "Roll No", "Student Name", "Class", "Section",
        "Math", "Science", "English", "Social Studies", "Punjabi"
    ]);
    let payload = json!({
        "table": {
            "source": "pdf",
            "pages": [
                [header, ["1", "Asha", "10", "A", "85", "90", "78", "88", "92"]],
                [header, ["2", "Ravi", "10", "B", "65", "70", null, "60", "55"]]
            ]
        }
    });
    let req = test::TestRequest::post()
        .uri("/api/records/validate")
        .set_json(payload)
        .to_request();
    let body: ValidationResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.issues, vec!["Non-numeric marks found in English".to_string()]);
}

#[actix_web::test]
async fn test_preview_renders_html() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::post()
        .uri("/api/dmc/preview")
        .set_json(json!({ "table": table(), "roll_no": "1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
    let body = test::read_body(resp).await;
    assert_eq!(body, "Asha Kaur #1");
}

#[actix_web::test]
async fn test_preview_unknown_roll_no() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::post()
        .uri("/api/dmc/preview")
        .set_json(json!({ "table": table(), "roll_no": "99" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_generate_single_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::post()
        .uri("/api/dmc/generate")
        .set_json(json!({ "table": table(), "roll_no": "1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("DMC_1.pdf"));
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
}

#[actix_web::test]
async fn test_generate_single_render_failure() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::post()
        .uri("/api/dmc/generate")
        .set_json(json!({ "table": table(), "roll_no": "2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "generation failed for record 2: rendering failed: Typst CLI exited with status 1"
    );
}

#[actix_web::test]
async fn test_generate_batch_continues_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let req = test::TestRequest::post()
        .uri("/api/dmc/generate")
        .set_json(json!({ "table": table() }))
        .to_request();
    let body: GenerateResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.generated, vec!["DMC_1.pdf".to_string()]);
    assert_eq!(body.failures.len(), 1);
    assert_eq!(body.failures[0].roll_no, "2");

    let saved = dir.path().join(body.batch_id.to_string()).join("DMC_1.pdf");
    assert_eq!(std::fs::read(saved).unwrap(), b"Asha Kaur".to_vec());
}

#[actix_web::test]
async fn test_generate_rejects_invalid_table() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let payload = json!({
        "table": {
            "source": "spreadsheet",
            "columns": columns(),
            "rows": [[1, "Asha", "10", "A", 85, "abc", 78, 88, 92]]
        }
    });
    let req = test::TestRequest::post()
        .uri("/api/dmc/generate")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: ValidationResponse = test::read_body_json(resp).await;
    assert!(!body.ok);
    assert_eq!(body.issues, vec!["Non-numeric marks found in Science".to_string()]);
}

#[actix_web::test]
async fn test_generate_skips_rows_without_roll_no() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(test_state(dir.path()));

    let payload = json!({
        "table": {
            "source": "spreadsheet",
            "columns": columns(),
            "rows": [
                [1, "Asha", "10", "A", 85, 90, 78, 88, 92],
                [null, "Nobody", "10", "A", 50, 50, 50, 50, 50]
            ]
        }
    });
    let req = test::TestRequest::post()
        .uri("/api/dmc/generate")
        .set_json(payload)
        .to_request();
    let body: GenerateResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.generated, vec!["DMC_1.pdf".to_string()]);
    assert!(body.failures.is_empty());
}

use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod api;
pub mod config;
pub mod derive;
pub mod generation;
pub mod records;
pub mod render;
pub mod schema;
pub mod validation;

pub use crate::api::DmcState;
pub use crate::config::AppConfig;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::get_schema,
        crate::api::handlers::validate_records,
        crate::api::handlers::preview_dmc,
        crate::api::handlers::generate_dmc
    ),
    components(
        schemas(
            api::models::TablePayload,
            api::models::ValidateRequest,
            api::models::ValidationResponse,
            api::models::PreviewRequest,
            api::models::GenerateRequest,
            api::models::GenerateResponse,
            api::models::FailureEntry,
            api::models::SchemaResponse,
            api::models::GradeBandResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "DMC", description = "Student record validation and DMC generation.")
    )
)]
pub struct ApiDoc;

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok(); // Load .env file

    let config = AppConfig::from_env().context("invalid configuration")?;
    let bind_addr = (config.host.clone(), config.port);
    let state = DmcState::from_config(config).context("failed to load DMC templates")?;
    let state = web::Data::new(state);

    let prometheus = PrometheusMetricsBuilder::new("dmc_generator")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let state = state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(state)
            .app_data(web::JsonConfig::default().limit(16 * 1024 * 1024))
            .service(web::scope("/api").configure(api::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind_addr)
    .context("failed to bind HTTP listener")?
    .run()
    .await
    .context("HTTP server stopped with an error")
}

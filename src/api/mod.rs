//! HTTP surface of the DMC service.
//!
//! - `GET  /api/schema`            - schema registry contents
//! - `POST /api/records/validate`  - run the record validator
//! - `POST /api/dmc/preview`       - HTML DMC for one roll number
//! - `POST /api/dmc/generate`      - PDF DMC for one roll number, or the whole batch

pub mod handlers;
pub mod models;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::web;

use crate::config::AppConfig;
use crate::generation::DmcPipeline;
use crate::render::{
    HtmlDmcRenderer, QrencodeCli, RenderError, TypstDmcRenderer, TypstRenderEngine,
};
use crate::schema::Schema;

/// Shared, read-only state handed to every handler.
pub struct DmcState {
    pub config: AppConfig,
    pub schema: Arc<Schema>,
    /// Renders PDFs through Typst.
    pub pdf: DmcPipeline,
    /// Renders HTML previews.
    pub preview: DmcPipeline,
}

impl DmcState {
    /// Wires the Typst, HTML and `qrencode` collaborators named in `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, RenderError> {
        let schema = Arc::new(schema_for(&config));
        let qr = QrencodeCli::new(config.qrencode_bin.clone());

        let typst = TypstDmcRenderer::new(
            &config.template_dir,
            TypstRenderEngine::new(config.typst_bin.clone()),
        )?;
        let html = HtmlDmcRenderer::new(&config.template_dir)?;

        let pdf = DmcPipeline::new(schema.clone(), Box::new(typst), Box::new(qr.clone()));
        let preview = DmcPipeline::new(schema.clone(), Box::new(html), Box::new(qr));

        Ok(Self {
            config,
            schema,
            pdf,
            preview,
        })
    }

    pub fn with_pipelines(
        config: AppConfig,
        schema: Arc<Schema>,
        pdf: DmcPipeline,
        preview: DmcPipeline,
    ) -> Self {
        Self {
            config,
            schema,
            pdf,
            preview,
        }
    }
}

/// Default schema with the configured subject override applied.
pub fn schema_for(config: &AppConfig) -> Schema {
    match &config.subject_columns {
        Some(subjects) => Schema::default().with_subject_columns(subjects.clone()),
        None => Schema::default(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/schema").route(web::get().to(handlers::get_schema)))
        .service(
            web::resource("/records/validate").route(web::post().to(handlers::validate_records)),
        )
        .service(web::resource("/dmc/preview").route(web::post().to(handlers::preview_dmc)))
        .service(web::resource("/dmc/generate").route(web::post().to(handlers::generate_dmc)));
}

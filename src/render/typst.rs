//! PDF DMC renderer backed by the Typst CLI.

use std::fs;
use std::path::Path;

use super::common::{escape_typst_string, fill_placeholders, format_issue_date, scalar_values};
use super::engine::TypstRenderEngine;
use super::traits::Renderer;
use super::{RenderError, RenderedDocument};
use crate::derive::DerivedRecord;

pub const TEMPLATE_FILE: &str = "dmc_template.typ";
/// Name the template uses to reference the QR image.
pub const QR_ASSET: &str = "qr.png";

pub struct TypstDmcRenderer {
    template: String,
    engine: TypstRenderEngine,
}

impl TypstDmcRenderer {
    /// Loads `dmc_template.typ` from `template_dir`.
    pub fn new(template_dir: &Path, engine: TypstRenderEngine) -> Result<Self, RenderError> {
        let template =
            fs::read_to_string(template_dir.join(TEMPLATE_FILE)).map_err(RenderError::TemplateIo)?;
        Ok(Self { template, engine })
    }

    /// Typst source with every placeholder filled. Scalars land inside string literals.
    pub fn render_source(&self, record: &DerivedRecord, issue_date: &str) -> String {
        let mut values = scalar_values(record, issue_date, escape_typst_string);
        values.insert("subject_cells", subject_cells(record));
        values.insert("qr_image", QR_ASSET.to_string());
        fill_placeholders(&self.template, &values)
    }
}

impl Renderer for TypstDmcRenderer {
    fn render(
        &self,
        record: &DerivedRecord,
        qr_png: &[u8],
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError> {
        let source = self.render_source(record, &format_issue_date());
        self.engine
            .render(TEMPLATE_FILE, &source, &[(QR_ASSET, qr_png)], output_name)
    }
}

/// Four table cells per subject: name, marks, grade, words.
fn subject_cells(record: &DerivedRecord) -> String {
    record
        .subjects
        .iter()
        .map(|mark| {
            format!(
                "  [#\"{}\"], [#\"{}\"], [#\"{}\"], [#\"{}\"],",
                escape_typst_string(&mark.subject),
                escape_typst_string(&mark.marks),
                escape_typst_string(&mark.grade),
                escape_typst_string(&mark.marks_in_words),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! HTML DMC renderer used for previews.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fs;
use std::path::Path;

use super::common::{
    escape_html, fill_placeholders, format_issue_date, safe_file_stem, scalar_values,
};
use super::traits::Renderer;
use super::{RenderError, RenderedDocument};
use crate::derive::DerivedRecord;

pub const TEMPLATE_FILE: &str = "dmc_template.html";

pub struct HtmlDmcRenderer {
    template: String,
}

impl HtmlDmcRenderer {
    /// Loads `dmc_template.html` from `template_dir`.
    pub fn new(template_dir: &Path) -> Result<Self, RenderError> {
        let template =
            fs::read_to_string(template_dir.join(TEMPLATE_FILE)).map_err(RenderError::TemplateIo)?;
        Ok(Self::from_template(template))
    }

    pub fn from_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Filled HTML as a string, with the QR PNG inlined as a data URI.
    pub fn render_html(&self, record: &DerivedRecord, qr_png: &[u8], issue_date: &str) -> String {
        let mut values = scalar_values(record, issue_date, escape_html);
        values.insert("subject_rows", subject_rows(record));
        values.insert("qr_code", BASE64.encode(qr_png));
        fill_placeholders(&self.template, &values)
    }
}

impl Renderer for HtmlDmcRenderer {
    fn render(
        &self,
        record: &DerivedRecord,
        qr_png: &[u8],
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError> {
        let html = self.render_html(record, qr_png, &format_issue_date());
        Ok(RenderedDocument::new(
            format!("{}.html", safe_file_stem(output_name)),
            html.into_bytes(),
        ))
    }
}

fn subject_rows(record: &DerivedRecord) -> String {
    record
        .subjects
        .iter()
        .map(|mark| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&mark.subject),
                escape_html(&mark.marks),
                escape_html(&mark.grade),
                escape_html(&mark.marks_in_words),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

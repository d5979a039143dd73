//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source and its assets to a
//! temporary directory, invoking the compiler, and reading back the PDF.

use std::fs;
use std::process::Command;
use tempfile::tempdir;
use tempfile::TempDir;

use super::common::safe_file_stem;
use super::{RenderError, RenderedDocument};

const DEFAULT_TYPST_BIN: &str = "typst";

/// Engine for compiling Typst sources to PDF with the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: String,
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TYPST_BIN)
    }
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Compile a Typst source string to a PDF document.
    ///
    /// # Arguments
    /// * `source_filename` - Name the source is written under (e.g. "dmc.typ").
    /// * `typst_source` - The complete, filled Typst source.
    /// * `assets` - Extra files the source references by name, such as the QR image.
    /// * `output_name` - File stem of the produced PDF.
    pub fn render(
        &self,
        source_filename: &str,
        typst_source: &str,
        assets: &[(&str, &[u8])],
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError> {
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;

        fs::write(temp_dir.path().join(source_filename), typst_source)
            .map_err(RenderError::WriteTypst)?;
        for (name, bytes) in assets {
            fs::write(temp_dir.path().join(name), bytes).map_err(|source| {
                RenderError::WriteAsset {
                    name: name.to_string(),
                    source,
                }
            })?;
        }

        let output_filename = format!("{}.pdf", safe_file_stem(output_name));
        let pdf = self.compile(&temp_dir, source_filename, &output_filename)?;

        Ok(RenderedDocument::new(output_filename, pdf))
    }

    fn compile(
        &self,
        temp_dir: &TempDir,
        source_filename: &str,
        output_filename: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let source_path = temp_dir.path().join(source_filename);
        let output_path = temp_dir.path().join(output_filename);

        let status = Command::new(&self.binary)
            .arg("compile")
            .arg(&source_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .status()
            .map_err(RenderError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(RenderError::TypstExit(code));
        }

        fs::read(&output_path).map_err(RenderError::ReadPdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_reported() {
        let engine = TypstRenderEngine::new("definitely-not-a-typst-binary");
        let result = engine.render("dmc.typ", "= Hi", &[("qr.png", &b"png"[..])], "DMC_1");
        assert!(matches!(result, Err(RenderError::TypstIo(_))));
    }
}

//! Render module - turning a derived record into a DMC document.
//!
//! Renderers are collaborators behind the `Renderer` trait:
//! - `HtmlDmcRenderer` - HTML preview with the QR code inlined
//! - `TypstDmcRenderer` - PDF compiled by the Typst CLI
//!
//! QR rasterisation sits behind `QrEncoder`; `QrencodeCli` shells out to `qrencode`.

pub mod common;
pub mod engine;
pub mod html;
pub mod qr;
pub mod traits;
pub mod typst;

pub use engine::TypstRenderEngine;
pub use html::HtmlDmcRenderer;
pub use qr::{QrError, QrencodeCli};
pub use traits::{QrEncoder, Renderer};
pub use typst::TypstDmcRenderer;

use thiserror::Error;

/// Errors that can occur while rendering a DMC.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("failed to write asset '{name}': {source}")]
    WriteAsset {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    /// MIME type is guessed from the filename extension.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string();
        Self {
            filename,
            mime_type,
            bytes,
        }
    }
}

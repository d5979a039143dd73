//! Seams for the external collaborators of DMC generation.

use super::qr::QrError;
use super::{RenderError, RenderedDocument};
use crate::derive::DerivedRecord;

/// Produces a document for one derived record.
pub trait Renderer: Send + Sync {
    /// `output_name` is the file stem, e.g. `DMC_17`.
    fn render(
        &self,
        record: &DerivedRecord,
        qr_png: &[u8],
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError>;
}

/// Turns a QR payload into PNG bytes.
pub trait QrEncoder: Send + Sync {
    fn encode(&self, payload: &str) -> Result<Vec<u8>, QrError>;
}

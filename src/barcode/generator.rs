//! One-call facade over sanitize, render and encode.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use super::encoder::PngEncoder;
use super::font::GlyphSource;
use super::renderer::{BarcodeRenderer, RenderedImage};
use super::sanitize::{sanitize, SanitizedCode};
use crate::error::RenderError;

/// Produces barcode images straight from raw user input.
///
/// Cheap to clone; the faces are shared.
#[derive(Debug, Clone)]
pub struct BarcodeGenerator {
    renderer: BarcodeRenderer,
    encoder: PngEncoder,
}

impl BarcodeGenerator {
    /// Create a generator from an existing renderer.
    pub fn new(renderer: BarcodeRenderer) -> Self {
        Self {
            renderer,
            encoder: PngEncoder::new(),
        }
    }

    /// Create a generator drawing with the given barcode and caption faces.
    pub fn from_faces(barcode_face: Arc<dyn GlyphSource>, plain_face: Arc<dyn GlyphSource>) -> Self {
        Self::new(BarcodeRenderer::new(barcode_face, plain_face))
    }

    /// Sanitize `raw` and render it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyCode`] if nothing encodable is left after
    /// sanitization.
    pub fn generate(
        &self,
        raw: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<RenderedImage, RenderError> {
        let code = sanitize(raw)?;
        self.renderer.render(&code, width, height)
    }

    /// Render an already sanitized code to PNG bytes.
    pub fn png_for(
        &self,
        code: &SanitizedCode,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Bytes, RenderError> {
        let image = self.renderer.render(code, width, height)?;
        self.encoder.encode(&image)
    }

    /// Sanitize, render and encode `raw` to PNG bytes.
    pub fn png(&self, raw: &str, width: Option<u32>, height: Option<u32>) -> Result<Bytes, RenderError> {
        let code = sanitize(raw)?;
        self.png_for(&code, width, height)
    }

    /// Sanitize, render and write `raw` as a PNG file.
    pub fn save(
        &self,
        raw: &str,
        path: impl AsRef<Path>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<(), RenderError> {
        let image = self.generate(raw, width, height)?;
        self.encoder.save(&image, path)
    }

    /// Sanitize, render and encode `raw`, returning the PNG as base64.
    pub fn base64(
        &self,
        raw: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<String, RenderError> {
        let image = self.generate(raw, width, height)?;
        self.encoder.to_base64(&image)
    }
}

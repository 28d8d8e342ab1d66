//! PNG encoder for rendered barcodes.
//!
//! PNG is the only output format. Encoding is lossless and deterministic:
//! the same image always produces the same bytes, which is what lets cache
//! entries be identified by their inputs instead of their content.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use image::codecs::png::PngEncoder as ImagePngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::renderer::RenderedImage;
use crate::error::RenderError;

/// MIME type of every encoded barcode.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Serializes rendered barcodes to PNG.
#[derive(Debug, Clone, Default)]
pub struct PngEncoder {}

impl PngEncoder {
    /// Create a new PNG encoder.
    pub fn new() -> Self {
        Self {}
    }

    /// Encode an image to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the image has a zero dimension or
    /// the PNG writer fails.
    pub fn encode(&self, image: &RenderedImage) -> Result<Bytes, RenderError> {
        let (width, height) = image.dimensions();
        let mut output = Vec::new();

        ImagePngEncoder::new(&mut output)
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::Encode {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }

    /// Encode an image and write it to `path`.
    pub fn save(&self, image: &RenderedImage, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let data = self.encode(image)?;
        std::fs::write(path, &data).map_err(|e| RenderError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Encode an image and return the PNG bytes as standard base64.
    pub fn to_base64(&self, image: &RenderedImage) -> Result<String, RenderError> {
        let data = self.encode(image)?;
        Ok(BASE64.encode(&data))
    }
}

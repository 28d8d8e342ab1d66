//! Barcode rendering.
//!
//! Turns an input string into a PNG image of the string set in a
//! barcode-style face, with the same string as a plain-text caption
//! underneath. This is a fixed-font rendering, not a real symbology.
//!
//! # Pipeline
//!
//! ```text
//! raw input ──► sanitize ──► BarcodeRenderer ──► PngEncoder ──► bytes
//!               [A-Z0-9]     draw, crop, fit       lossless
//! ```
//!
//! # Components
//!
//! - [`sanitize`] / [`SanitizedCode`]: normalization of raw input
//! - [`GlyphSource`] / [`TtfFace`]: the font seam and its TrueType implementation
//! - [`BarcodeRenderer`]: draws onto a fixed 2000x60 canvas, crops to the ink
//!   and shrinks to a requested size
//! - [`PngEncoder`]: PNG bytes, files and base64
//! - [`BarcodeGenerator`]: all of the above in one call
//! - [`BarcodeRequest`]: the positional parameters of an HTTP request
//!
//! # Example
//!
//! ```no_run
//! use barcode_server::barcode::{BarcodeGenerator, TtfFace};
//! use std::sync::Arc;
//!
//! let barcode = Arc::new(TtfFace::from_file("fonts/FRE3OF9X.TTF")?);
//! let plain = Arc::new(TtfFace::from_file("fonts/DejaVuSans.ttf")?);
//! let generator = BarcodeGenerator::from_faces(barcode, plain);
//!
//! let png = generator.png("test123", None, None)?;
//! assert_eq!(&png[1..4], b"PNG");
//! # Ok::<(), barcode_server::RenderError>(())
//! ```

mod encoder;
mod font;
mod generator;
mod renderer;
mod request;
mod sanitize;

pub use encoder::{PngEncoder, PNG_CONTENT_TYPE};
pub use font::{points_to_pixels, GlyphSource, TtfFace, RENDER_DPI};
pub use generator::BarcodeGenerator;
pub use renderer::{
    BarcodeRenderer, CaptionAdjustment, RenderedImage, BARCODE_POINT_SIZE, CANVAS_HEIGHT,
    CANVAS_WIDTH, CAPTION_POINT_SIZE, FREE3OF9_CAPTION_ADJUSTMENT,
};
pub use request::{parse_dimension, BarcodeRequest};
pub use sanitize::{sanitize, SanitizedCode};

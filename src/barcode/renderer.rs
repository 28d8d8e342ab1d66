//! Barcode rasterizer.
//!
//! A barcode is drawn in two lines on an oversized white canvas:
//!
//! ```text
//! ┌──────────────────────────── 2000 px ────────────────────────────┐
//! │                      ║│║║ │║│ ║║│ ║│║ ║║│      barcode face, 36pt │ 60 px
//! │                          TEST123               plain face, 14pt │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both lines are centered horizontally using their own measured ink box, then
//! the canvas is cropped to the wider of the two and, if the caller asked for
//! it, downsampled to the requested size.
//!
//! Rendering is a pure function of the code, the requested size and the two
//! faces. The response cache relies on this: its validators are derived from
//! those inputs alone, never from the produced bytes.

use std::fmt;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use tiny_skia::{Color, FillRule, Paint, Path, Pixmap, Transform};

use super::font::{points_to_pixels, GlyphSource};
use super::sanitize::SanitizedCode;
use crate::error::RenderError;

/// Width of the working canvas in pixels.
pub const CANVAS_WIDTH: u32 = 2000;

/// Height of the working canvas, and of every unresized barcode, in pixels.
pub const CANVAS_HEIGHT: u32 = 60;

/// Size of the barcode line.
pub const BARCODE_POINT_SIZE: f32 = 36.0;

/// Size of the human-readable caption.
pub const CAPTION_POINT_SIZE: f32 = 14.0;

/// Both lines are shifted this many pixels left of true center.
const CENTER_NUDGE: f32 = 2.0;

/// A raster barcode: RGB on a white background.
pub type RenderedImage = RgbImage;

// =============================================================================
// Caption Adjustment
// =============================================================================

/// Extra downward offset applied to the caption line.
///
/// The offset compensates for how a specific barcode face reports its glyph
/// metrics, so it is only valid together with that face. Codes containing any
/// of the `exempt` characters are drawn without the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionAdjustment {
    /// Pixels added to the caption baseline.
    pub offset: f32,

    /// Characters whose presence in the code cancels the offset.
    pub exempt: &'static [char],
}

impl CaptionAdjustment {
    /// No correction.
    pub const NONE: Self = Self {
        offset: 0.0,
        exempt: &[],
    };

    /// Offset to apply for the given code.
    pub fn offset_for(&self, code: &SanitizedCode) -> f32 {
        if code.contains_any(self.exempt) {
            0.0
        } else {
            self.offset
        }
    }
}

/// Correction for the Free 3 of 9 barcode face.
///
/// With that face the caption sits 5 px too high, except when the code
/// contains `J` or `Q`, whose bar patterns already push the measured box down.
/// Replace it when switching to a different barcode font.
pub const FREE3OF9_CAPTION_ADJUSTMENT: CaptionAdjustment = CaptionAdjustment {
    offset: 5.0,
    exempt: &['J', 'Q'],
};

// =============================================================================
// Text Layout
// =============================================================================

/// Glyph outlines for one line of text, positioned relative to the pen origin.
struct TextRun {
    glyphs: Vec<Path>,
    ink: Option<InkBounds>,
}

#[derive(Debug, Clone, Copy)]
struct InkBounds {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl InkBounds {
    fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl TextRun {
    fn layout(face: &dyn GlyphSource, text: &str, px: f32) -> Self {
        let mut glyphs = Vec::with_capacity(text.len());
        let mut ink: Option<InkBounds> = None;
        let mut pen_x = 0.0;

        for ch in text.chars() {
            let placed = face
                .outline(ch, px)
                .and_then(|path| path.transform(Transform::from_translate(pen_x, 0.0)));

            if let Some(path) = placed {
                let b = path.bounds();
                let bounds = InkBounds {
                    left: b.left(),
                    top: b.top(),
                    right: b.right(),
                    bottom: b.bottom(),
                };
                ink = Some(ink.map_or(bounds, |acc| acc.union(bounds)));
                glyphs.push(path);
            }

            pen_x += face.advance(ch, px);
        }

        Self { glyphs, ink }
    }

    /// Measured ink width, rounded to whole pixels.
    fn width(&self) -> f32 {
        self.ink.map_or(0.0, |b| (b.right - b.left).round())
    }

    /// Measured ink height, rounded to whole pixels.
    fn height(&self) -> f32 {
        self.ink.map_or(0.0, |b| (b.bottom - b.top).round())
    }

    fn draw(&self, pixmap: &mut Pixmap, x: f32, baseline: f32, paint: &Paint<'_>) {
        let transform = Transform::from_translate(x, baseline);
        let mut canvas = pixmap.as_mut();
        for glyph in &self.glyphs {
            canvas.fill_path(glyph, paint, FillRule::Winding, transform, None);
        }
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Draws barcodes with a barcode-style face over a plain caption face.
#[derive(Clone)]
pub struct BarcodeRenderer {
    barcode_face: Arc<dyn GlyphSource>,
    plain_face: Arc<dyn GlyphSource>,
    caption_adjustment: CaptionAdjustment,
}

impl BarcodeRenderer {
    /// Create a renderer using the Free 3 of 9 caption correction.
    pub fn new(barcode_face: Arc<dyn GlyphSource>, plain_face: Arc<dyn GlyphSource>) -> Self {
        Self {
            barcode_face,
            plain_face,
            caption_adjustment: FREE3OF9_CAPTION_ADJUSTMENT,
        }
    }

    /// Replace the caption correction, e.g. after swapping the barcode face.
    pub fn with_caption_adjustment(mut self, adjustment: CaptionAdjustment) -> Self {
        self.caption_adjustment = adjustment;
        self
    }

    /// The caption correction in use.
    pub fn caption_adjustment(&self) -> CaptionAdjustment {
        self.caption_adjustment
    }

    /// Render `code`, optionally shrunk to fit `width` x `height`.
    ///
    /// Each requested axis is clamped to the natural cropped size, so the
    /// result is never upscaled. An unspecified axis keeps its natural size.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Canvas`] if the working canvas cannot be
    /// allocated.
    pub fn render(
        &self,
        code: &SanitizedCode,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<RenderedImage, RenderError> {
        let mut pixmap =
            Pixmap::new(CANVAS_WIDTH, CANVAS_HEIGHT).ok_or(RenderError::Canvas {
                width: CANVAS_WIDTH,
                height: CANVAS_HEIGHT,
            })?;
        pixmap.fill(Color::WHITE);

        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = true;

        let center = CANVAS_WIDTH as f32 / 2.0;

        // Barcode line, baseline at its own height
        let barcode = TextRun::layout(
            self.barcode_face.as_ref(),
            code.as_str(),
            points_to_pixels(BARCODE_POINT_SIZE),
        );
        let barcode_width = barcode.width();
        let barcode_height = barcode.height();
        let barcode_x = center - barcode_width / 2.0 - CENTER_NUDGE;
        barcode.draw(&mut pixmap, barcode_x, barcode_height, &paint);

        // Caption directly beneath
        let caption = TextRun::layout(
            self.plain_face.as_ref(),
            code.as_str(),
            points_to_pixels(CAPTION_POINT_SIZE),
        );
        let caption_width = caption.width();
        let caption_x = center - caption_width / 2.0 - CENTER_NUDGE;
        let caption_y =
            barcode_height + caption.height() + self.caption_adjustment.offset_for(code);
        caption.draw(&mut pixmap, caption_x, caption_y, &paint);

        let cropped = crop(
            &pixmap,
            barcode_x.min(caption_x),
            barcode_width.max(caption_width),
        );

        Ok(fit(cropped, width, height))
    }
}

impl fmt::Debug for BarcodeRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarcodeRenderer")
            .field("caption_adjustment", &self.caption_adjustment)
            .finish_non_exhaustive()
    }
}

/// Copy a full-height horizontal band of the canvas into an RGB image.
///
/// The band is clamped to the canvas and is at least one pixel wide.
fn crop(pixmap: &Pixmap, x: f32, width: f32) -> RenderedImage {
    let x = (x.floor().max(0.0) as u32).min(CANVAS_WIDTH - 1);
    let width = (width.ceil().max(1.0) as u32).min(CANVAS_WIDTH - x);

    RgbImage::from_fn(width, CANVAS_HEIGHT, |dx, y| {
        match pixmap.pixel(x + dx, y) {
            Some(pixel) => {
                let c = pixel.demultiply();
                Rgb([c.red(), c.green(), c.blue()])
            }
            None => Rgb([255, 255, 255]),
        }
    })
}

/// Downsample to the requested size, never beyond the natural size.
fn fit(image: RenderedImage, width: Option<u32>, height: Option<u32>) -> RenderedImage {
    if width.is_none() && height.is_none() {
        return image;
    }

    let (natural_width, natural_height) = image.dimensions();
    let target_width = width.unwrap_or(natural_width).clamp(1, natural_width);
    let target_height = height.unwrap_or(natural_height).clamp(1, natural_height);

    if (target_width, target_height) == (natural_width, natural_height) {
        return image;
    }

    imageops::resize(&image, target_width, target_height, FilterType::Triangle)
}

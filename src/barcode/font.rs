//! Glyph faces used by the renderer.
//!
//! The renderer only needs two things from a font: how far the pen advances
//! after a character and the character's outline. [`GlyphSource`] is that
//! seam. [`TtfFace`] implements it on top of a TrueType/OpenType file: Skrifa
//! reads every mapped glyph once when the face is loaded, and the outlines are
//! kept as tiny-skia paths in font units.

use std::collections::HashMap;
use std::fmt;
use std::path::Path as FsPath;

use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::raw::FontRef;
use skrifa::MetadataProvider;
use tiny_skia::{Path, PathBuilder, Transform};

use crate::error::RenderError;

/// Resolution point sizes are interpreted at.
pub const RENDER_DPI: f32 = 96.0;

/// Convert a point size to pixels per em.
#[inline]
pub fn points_to_pixels(points: f32) -> f32 {
    points * RENDER_DPI / 72.0
}

/// Source of glyph metrics and outlines.
///
/// Outlines are returned in pixel space with the origin at the pen position on
/// the baseline and y growing downward, ready to be translated onto a canvas.
pub trait GlyphSource: Send + Sync {
    /// Horizontal advance of `ch` at `px` pixels per em.
    ///
    /// Characters the face cannot map advance by zero.
    fn advance(&self, ch: char, px: f32) -> f32;

    /// Outline of `ch` at `px` pixels per em, or `None` for blank or unmapped
    /// glyphs.
    fn outline(&self, ch: char, px: f32) -> Option<Path>;
}

// =============================================================================
// TrueType Face
// =============================================================================

/// Metrics and outline of one mapped character, in font units.
struct FaceGlyph {
    advance: f32,
    outline: Option<Path>,
}

/// A font parsed once at load time.
///
/// Every character in the font's charmap is resolved up front to its advance
/// and unscaled outline, so rendering only scales stored paths and never
/// touches the font tables again.
pub struct TtfFace {
    name: String,
    units_per_em: f32,
    glyphs: HashMap<char, FaceGlyph>,
}

impl TtfFace {
    /// Load a font from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::FontLoad`] if the file cannot be read or is not
    /// a font Skrifa can parse.
    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| RenderError::FontLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(path.display().to_string(), data)
    }

    /// Parse font bytes already in memory.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, RenderError> {
        let name = name.into();
        let font = FontRef::new(&data).map_err(|e| RenderError::FontLoad {
            path: name.clone(),
            message: e.to_string(),
        })?;

        let location = LocationRef::default();
        let units_per_em = font.metrics(Size::unscaled(), location).units_per_em;
        if units_per_em == 0 {
            return Err(RenderError::FontLoad {
                path: name,
                message: "units per em is zero".to_string(),
            });
        }

        let metrics = font.glyph_metrics(Size::unscaled(), location);
        let outlines = font.outline_glyphs();
        let glyphs = font
            .charmap()
            .mappings()
            .filter_map(|(codepoint, glyph_id)| {
                let ch = char::from_u32(codepoint)?;
                let outline = outlines.get(glyph_id).and_then(|glyph| {
                    let mut pen = PathPen::default();
                    let settings = DrawSettings::unhinted(Size::unscaled(), location);
                    glyph.draw(settings, &mut pen).ok()?;
                    pen.finish()
                });
                let glyph = FaceGlyph {
                    advance: metrics.advance_width(glyph_id).unwrap_or(0.0),
                    outline,
                };
                Some((ch, glyph))
            })
            .collect();

        Ok(Self {
            name,
            units_per_em: f32::from(units_per_em),
            glyphs,
        })
    }

    /// Where the font was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn scale(&self, px: f32) -> f32 {
        px / self.units_per_em
    }
}

impl fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfFace")
            .field("name", &self.name)
            .field("units_per_em", &self.units_per_em)
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

impl GlyphSource for TtfFace {
    fn advance(&self, ch: char, px: f32) -> f32 {
        self.glyphs
            .get(&ch)
            .map_or(0.0, |glyph| glyph.advance * self.scale(px))
    }

    fn outline(&self, ch: char, px: f32) -> Option<Path> {
        let outline = self.glyphs.get(&ch)?.outline.clone()?;
        let scale = self.scale(px);
        outline.transform(Transform::from_scale(scale, scale))
    }
}

// =============================================================================
// Outline Pen
// =============================================================================

/// Collects Skrifa outline commands into a tiny-skia path, flipping the
/// y axis from font space (up) to raster space (down).
struct PathPen {
    builder: PathBuilder,
}

impl Default for PathPen {
    fn default() -> Self {
        Self {
            builder: PathBuilder::new(),
        }
    }
}

impl PathPen {
    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, -y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, -y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.builder.quad_to(cx0, -cy0, x, -y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.builder.cubic_to(cx0, -cy0, cx1, -cy1, x, -y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

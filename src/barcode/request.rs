//! Inbound barcode request parameters.

use super::sanitize::{sanitize, SanitizedCode};
use crate::error::RenderError;

/// The three positional parameters of a barcode request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeRequest {
    /// Code exactly as the client sent it
    pub raw: String,

    /// Requested width in pixels, if any
    pub width: Option<u32>,

    /// Requested height in pixels, if any
    pub height: Option<u32>,
}

impl BarcodeRequest {
    pub fn new(raw: impl Into<String>, width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            raw: raw.into(),
            width,
            height,
        }
    }

    /// Build a request from raw path segments.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimension`] if a width or height segment
    /// is present but not a positive integer.
    pub fn from_segments(
        raw: impl Into<String>,
        width: Option<&str>,
        height: Option<&str>,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            raw: raw.into(),
            width: parse_dimension("width", width)?,
            height: parse_dimension("height", height)?,
        })
    }

    /// Normalize the code.
    pub fn sanitized(&self) -> Result<SanitizedCode, RenderError> {
        sanitize(&self.raw)
    }
}

/// Parse one optional dimension segment.
///
/// Missing, empty and `0` all mean "unspecified".
pub fn parse_dimension(axis: &'static str, value: Option<&str>) -> Result<Option<u32>, RenderError> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<u32>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(RenderError::InvalidDimension {
            axis,
            value: value.to_string(),
        }),
    }
}

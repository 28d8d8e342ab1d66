//! HTTP request handlers for the barcode API.
//!
//! # Endpoints
//!
//! - `GET /barcode/{code}[/{width}[/{height}]]` - Serve a barcode PNG
//! - `GET /health` - Health check endpoint

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, Uri, Version},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::barcode::BarcodeRequest;
use crate::cache::{CacheStore, CachedResponse, ConditionalCache, ValidatorSource};
use crate::error::BarcodeError;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state, passed to handlers via Axum's State extractor.
pub struct AppState<S> {
    pub cache: ConditionalCache<S>,
}

impl<S: CacheStore> AppState<S> {
    pub fn new(cache: ConditionalCache<S>) -> Self {
        Self { cache }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for barcode requests.
///
/// Extracted from `/barcode/{code}`, `/barcode/{code}/{width}` or
/// `/barcode/{code}/{width}/{height}`. Dimensions stay as text until
/// validated so a bad value can be reported verbatim.
#[derive(Debug, Deserialize)]
pub struct BarcodePathParams {
    /// Raw code, percent-decoded
    pub code: String,

    /// Width segment, if present
    pub width: Option<String>,

    /// Height segment, if present
    pub height: Option<String>,
}

impl BarcodePathParams {
    /// Split a raw request path such as `/barcode/TEST%FF123/100`.
    ///
    /// Each segment is percent-decoded to bytes and read as lossy UTF-8, so
    /// undecodable bytes become replacement characters that sanitization
    /// later drops. Returns `None` unless the path is `/barcode/` followed by
    /// one to three segments.
    pub fn from_raw_path(path: &str) -> Option<Self> {
        let mut segments = path.strip_prefix('/')?.split('/');
        if segments.next()? != "barcode" {
            return None;
        }

        let code = decode_segment(segments.next()?);
        let width = segments.next().map(decode_segment);
        let height = segments.next().map(decode_segment);
        if segments.next().is_some() {
            return None;
        }

        Some(Self {
            code,
            width,
            height,
        })
    }

    /// Validate the segments into a request.
    pub fn into_request(self) -> Result<BarcodeRequest, BarcodeError> {
        Ok(BarcodeRequest::from_segments(
            self.code,
            self.width.as_deref(),
            self.height.as_deref(),
        )?)
    }
}

fn decode_segment(segment: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes())).into_owned()
}

// =============================================================================
// Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle barcode requests.
///
/// # Endpoint
///
/// `GET /barcode/{code}/{width?}/{height?}`
///
/// # Responses
///
/// - `200 OK`: PNG body with `ETag`, `Last-Modified`, `Expires`,
///   `Cache-Control` and `X-CDN-CACHE: HIT|MISS`
/// - `304 Not Modified`: `If-None-Match` matched the ETag; empty body
/// - `400 Bad Request`: code empty after sanitization, or a dimension is not
///   a positive integer
/// - `500 Internal Server Error`: the image could not be rendered or stored
///
/// Segments that do not percent-decode to UTF-8 are re-read from the raw
/// URI rather than rejected, so they still go through sanitization.
///
/// Error bodies are JSON:
/// ```json
/// {"status":400,"message":"Failed to generate barcode.","error":"String cannot be empty"}
/// ```
pub async fn barcode_handler<S>(
    State(state): State<AppState<S>>,
    params: Result<Path<BarcodePathParams>, PathRejection>,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
) -> CachedResponse
where
    S: CacheStore + 'static,
{
    let params = match params {
        Ok(Path(params)) => Some(params),
        Err(rejection) => {
            debug!("Path rejected ({}), decoding raw segments", rejection);
            BarcodePathParams::from_raw_path(uri.path())
        }
    };
    let request = match params
        .ok_or_else(|| BarcodeError::InvalidPath {
            message: uri.path().to_string(),
        })
        .and_then(BarcodePathParams::into_request)
    {
        Ok(request) => request,
        Err(e) => {
            warn!(status = 400, "Client error: {}", e);
            return CachedResponse::failure(&e, Utc::now());
        }
    };

    let if_none_match = ValidatorSource::Headers(&headers).if_none_match();

    state
        .cache
        .serve(&request, if_none_match.as_deref(), version)
        .await
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

//! Shared helpers for integration tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tiny_skia::{PathBuilder, Rect};
use tower::ServiceExt;

use barcode_server::{create_router, BarcodeGenerator, FsCacheStore, GlyphSource, RouterConfig};

// =============================================================================
// Synthetic Faces
// =============================================================================

/// Face whose glyphs are solid rectangles, so rendering needs no font files.
///
/// Every glyph is 0.5 em wide and 0.7 em tall on the baseline and advances
/// 0.6 em. Outline requests are counted to tell renders from cache hits.
#[derive(Default)]
pub struct BlockFace {
    outlines: AtomicUsize,
}

impl BlockFace {
    pub fn outline_count(&self) -> usize {
        self.outlines.load(Ordering::SeqCst)
    }
}

impl GlyphSource for BlockFace {
    fn advance(&self, _ch: char, px: f32) -> f32 {
        px * 0.6
    }

    fn outline(&self, _ch: char, px: f32) -> Option<tiny_skia::Path> {
        self.outlines.fetch_add(1, Ordering::SeqCst);
        let rect = Rect::from_xywh(0.05 * px, -0.7 * px, 0.5 * px, 0.7 * px)?;
        Some(PathBuilder::from_rect(rect))
    }
}

// =============================================================================
// Router Helpers
// =============================================================================

/// A router over `cache_dir` plus the face it renders with.
pub fn test_router(cache_dir: &Path) -> (Router, Arc<BlockFace>) {
    test_router_with_config(cache_dir, RouterConfig::new().with_tracing(false))
}

pub fn test_router_with_config(cache_dir: &Path, config: RouterConfig) -> (Router, Arc<BlockFace>) {
    let face = Arc::new(BlockFace::default());
    let generator = BarcodeGenerator::from_faces(face.clone(), face.clone());
    let router = create_router(FsCacheStore::new(cache_dir), generator, config);
    (router, face)
}

/// Send a GET for `uri`, with optional `If-None-Match`.
pub async fn get(router: &Router, uri: &str, if_none_match: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(etag) = if_none_match {
        builder = builder.header("if-none-match", etag);
    }
    let request = builder.body(Body::empty()).unwrap();

    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {}", name))
        .to_str()
        .unwrap()
}

/// Quoted MD5 of a fingerprint, as sent in `ETag`.
pub fn etag_for(fingerprint: &str) -> String {
    format!("\"{:x}\"", md5::compute(fingerprint.as_bytes()))
}

pub fn is_valid_png(data: &[u8]) -> bool {
    data.len() > 8 && data[..8] == [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
}

pub fn png_dimensions(data: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory_with_format(data, image::ImageFormat::Png).unwrap();
    (image.width(), image.height())
}

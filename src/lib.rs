//! # Barcode Server
//!
//! Renders a stylised "barcode" (a string set in a barcode font with a
//! plain-text caption underneath) as a PNG image and serves it over HTTP.
//! Rendered images are kept in a cache directory so each one is rasterized
//! only once, and clients revalidate with standard conditional GETs.
//!
//! ## Features
//!
//! - **Deterministic rendering**: the same code and size always produce the same bytes
//! - **Crop and shrink**: output is cropped to the ink and never upscaled
//! - **Filesystem cache**: one PNG per fingerprint, no eviction
//! - **Conditional GET**: `ETag` / `If-None-Match`, `Last-Modified`, `Expires`
//!
//! ## Architecture
//!
//! - [`barcode`] - Sanitizer, font faces, renderer and PNG encoder
//! - [`cache`] - Fingerprints, cache store and the conditional-GET state machine
//! - [`server`] - Axum handlers and router
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use barcode_server::{create_router, BarcodeGenerator, FsCacheStore, RouterConfig, TtfFace};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = BarcodeGenerator::from_faces(
//!         Arc::new(TtfFace::from_file("fonts/FRE3OF9X.TTF")?),
//!         Arc::new(TtfFace::from_file("fonts/DejaVuSans.ttf")?),
//!     );
//!     let store = FsCacheStore::new("/var/cache/barcodes");
//!     store.ensure_dir().await?;
//!
//!     let router = create_router(store, generator, RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod barcode;
pub mod cache;
pub mod config;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use barcode::{
    sanitize, BarcodeGenerator, BarcodeRenderer, BarcodeRequest, CaptionAdjustment, GlyphSource,
    PngEncoder, RenderedImage, SanitizedCode, TtfFace, FREE3OF9_CAPTION_ADJUSTMENT,
};
pub use cache::{
    CacheEntry, CacheFingerprint, CacheStatus, CacheStore, CachedResponse, ConditionalCache,
    FsCacheStore, ValidatorSource,
};
pub use config::{Cli, Command, RenderConfig, ServeConfig};
pub use error::{BarcodeError, CacheError, RenderError};
pub use server::{create_router, AppState, HealthResponse, RouterConfig};

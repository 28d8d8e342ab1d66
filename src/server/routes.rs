//! Router configuration for the barcode server.
//!
//! # Route Structure
//!
//! ```text
//! /health                                - Health check
//! /barcode/{code}                        - Natural size
//! /barcode/{code}/{width}                - Shrunk to width
//! /barcode/{code}/{width}/{height}       - Shrunk to width x height
//! ```
//!
//! # Example
//!
//! ```ignore
//! use barcode_server::barcode::BarcodeGenerator;
//! use barcode_server::cache::FsCacheStore;
//! use barcode_server::server::{create_router, RouterConfig};
//!
//! let generator = BarcodeGenerator::from_faces(barcode_face, plain_face);
//! let store = FsCacheStore::new("/var/cache/barcodes");
//! store.ensure_dir().await?;
//!
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//! let router = create_router(store, generator, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::{CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{barcode_handler, health_handler, AppState};
use crate::barcode::BarcodeGenerator;
use crate::cache::{CacheStore, ConditionalCache, DEFAULT_CACHE_MAX_AGE, X_CDN_CACHE};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Cache max-age is one year (31536000 seconds)
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router over `store`, rendering misses with
/// `generator`.
pub fn create_router<S>(store: S, generator: BarcodeGenerator, config: RouterConfig) -> Router
where
    S: CacheStore + 'static,
{
    let cache = ConditionalCache::new(store, generator).with_max_age(config.cache_max_age);
    let app_state = AppState::new(cache);

    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/barcode/{code}", get(barcode_handler::<S>))
        .route("/barcode/{code}/{width}", get(barcode_handler::<S>))
        .route("/barcode/{code}/{width}/{height}", get(barcode_handler::<S>))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, IF_NONE_MATCH])
        .expose_headers([ETAG, X_CDN_CACHE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

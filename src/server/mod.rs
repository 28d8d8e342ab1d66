//! HTTP server layer.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       HTTP Layer                         │
//! │        GET /barcode/{code}/{width?}/{height?}            │
//! │                                                          │
//! │   ┌──────────────┐            ┌──────────────────────┐   │
//! │   │   handlers   │            │        routes        │   │
//! │   │ (path parse) │            │ (CORS, tracing, max- │   │
//! │   │              │            │  age)                │   │
//! │   └──────┬───────┘            └──────────────────────┘   │
//! └──────────┼───────────────────────────────────────────────┘
//!            ▼
//!     ConditionalCache ──► CacheStore / BarcodeGenerator
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{barcode_handler, health_handler, AppState, BarcodePathParams, HealthResponse};
pub use routes::{create_router, RouterConfig};

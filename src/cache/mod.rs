//! Filesystem-backed conditional cache.
//!
//! Rendering is CPU-bound, so every image is rendered once and written to a
//! cache directory under its fingerprint. Clients revalidate with
//! `If-None-Match` against an ETag derived from that same fingerprint.
//!
//! # Components
//!
//! - [`CacheFingerprint`]: `BARCODE-{code}-{width}x{height}.png`, file name and ETag seed
//! - [`CacheStore`] / [`FsCacheStore`]: blob store whose directory is its index
//! - [`ValidatorSource`]: finds the client's `If-None-Match` value
//! - [`ConditionalCache`]: the 304 / HIT / MISS / failure state machine
//! - [`CachedResponse`]: the single response value each request produces
//!
//! Entries never expire on the server. Freshness is only advertised through
//! `Cache-Control` and `Expires`.

mod conditional;
mod fingerprint;
mod response;
mod store;
mod validators;

pub use conditional::ConditionalCache;
pub use fingerprint::CacheFingerprint;
pub use response::{
    http_date, CacheStatus, CachedResponse, FailureEnvelope, DEFAULT_CACHE_MAX_AGE,
    EXPIRED_DATE, FAILURE_MESSAGE, INTERNAL_ERROR_TEXT, X_CDN_CACHE,
};
pub use store::{CacheEntry, CacheStore, CachedBlob, FsCacheStore};
pub use validators::{
    reconstruct_headers, title_case, ValidatorSource, TRANSPORT_HEADER_PREFIX,
    TRANSPORT_IF_NONE_MATCH,
};

//! Conditional-GET serving of barcode images.
//!
//! One pass per request, no state kept between requests:
//!
//! ```text
//! sanitize ──► fingerprint ──► If-None-Match == ETag? ──yes──► 304
//!                                      │ no
//!                                      ▼
//!                              entry in store? ──yes──► 200 HIT
//!                                      │ no
//!                                      ▼
//!                          render + encode + put ──ok──► 200 MISS
//!                                      │ err
//!                                      ▼
//!                                 400 / 500 JSON
//! ```

use std::sync::Arc;

use chrono::Utc;
use http::Version;
use tracing::{debug, error, warn};

use super::fingerprint::CacheFingerprint;
use super::response::{CacheStatus, CachedResponse, DEFAULT_CACHE_MAX_AGE};
use super::store::CacheStore;
use crate::barcode::{BarcodeGenerator, BarcodeRequest, SanitizedCode};
use crate::error::{BarcodeError, CacheError};

/// Serves barcodes from a [`CacheStore`], rendering on a miss.
pub struct ConditionalCache<S> {
    store: Arc<S>,
    generator: BarcodeGenerator,
    max_age: u32,
}

impl<S> Clone for ConditionalCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: self.generator.clone(),
            max_age: self.max_age,
        }
    }
}

impl<S: CacheStore> ConditionalCache<S> {
    pub fn new(store: S, generator: BarcodeGenerator) -> Self {
        Self {
            store: Arc::new(store),
            generator,
            max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }

    /// Set the freshness lifetime advertised to clients, in seconds.
    pub fn with_max_age(mut self, max_age: u32) -> Self {
        self.max_age = max_age;
        self
    }

    /// Answer one request.
    ///
    /// `if_none_match` is the client's validator, if any. `version` is echoed
    /// on a 304. Failures are folded into the returned response.
    pub async fn serve(
        &self,
        request: &BarcodeRequest,
        if_none_match: Option<&str>,
        version: Version,
    ) -> CachedResponse {
        let code = match request.sanitized() {
            Ok(code) => code,
            Err(e) => return self.fail(None, e.into()),
        };
        let fingerprint = CacheFingerprint::new(&code, request.width, request.height);
        let etag = fingerprint.etag();

        if if_none_match == Some(etag.as_str()) {
            debug!(fingerprint = %fingerprint, "Client copy is current");
            return CachedResponse::not_modified(version);
        }

        if self.store.exists(&fingerprint).await {
            match self.store.get(&fingerprint).await {
                Ok(blob) => {
                    debug!(fingerprint = %fingerprint, bytes = blob.data.len(), "Cache hit");
                    return CachedResponse::image(
                        blob.data,
                        &etag,
                        blob.entry.last_modified,
                        CacheStatus::Hit,
                        self.max_age,
                        Utc::now(),
                    );
                }
                // Removed between the check and the read; render it again
                Err(CacheError::NotFound(_)) => {}
                Err(e) => return self.fail(Some(&fingerprint), e.into()),
            }
        }

        match self.generate(&fingerprint, code, request).await {
            Ok(response) => response,
            Err(e) => self.fail(Some(&fingerprint), e),
        }
    }

    async fn generate(
        &self,
        fingerprint: &CacheFingerprint,
        code: SanitizedCode,
        request: &BarcodeRequest,
    ) -> Result<CachedResponse, BarcodeError> {
        debug!(fingerprint = %fingerprint, "Cache miss, rendering");

        let generator = self.generator.clone();
        let (width, height) = (request.width, request.height);
        let data = tokio::task::spawn_blocking(move || generator.png_for(&code, width, height))
            .await
            .map_err(|e| BarcodeError::Task {
                message: e.to_string(),
            })??;

        let entry = self.store.put(fingerprint, data.clone()).await?;

        Ok(CachedResponse::image(
            data,
            &fingerprint.etag(),
            entry.last_modified,
            CacheStatus::Miss,
            self.max_age,
            Utc::now(),
        ))
    }

    fn fail(&self, fingerprint: Option<&CacheFingerprint>, err: BarcodeError) -> CachedResponse {
        let fingerprint = fingerprint.map(|f| f.as_str()).unwrap_or("-");
        if err.is_client_error() {
            warn!(fingerprint = fingerprint, status = 400, "Client error: {}", err);
        } else {
            error!(fingerprint = fingerprint, status = 500, "Server error: {}", err);
        }
        CachedResponse::failure(&err, Utc::now())
    }
}

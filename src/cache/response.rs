//! Response values produced by the conditional cache.
//!
//! Every outcome is assembled into one [`CachedResponse`] (status, headers and
//! body) and handed back whole. Nothing downstream adds to it.

use std::time::SystemTime;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use http::header::{
    CACHE_CONTROL, CONTENT_TYPE, ETAG, EXPIRES, LAST_MODIFIED, PRAGMA,
};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Version};
use serde::{Deserialize, Serialize};

use crate::barcode::PNG_CONTENT_TYPE;
use crate::error::BarcodeError;

/// Header reporting whether the body came from the cache.
pub const X_CDN_CACHE: HeaderName = HeaderName::from_static("x-cdn-cache");

/// Freshness lifetime of served images: one year.
pub const DEFAULT_CACHE_MAX_AGE: u32 = 31_536_000;

/// `Expires` value on error responses.
pub const EXPIRED_DATE: &str = "Mon, 26 Jul 1997 05:00:00 GMT";

/// Envelope message on every failure.
pub const FAILURE_MESSAGE: &str = "Failed to generate barcode.";

/// Error text shown to clients for server-side failures.
pub const INTERNAL_ERROR_TEXT: &str = "Internal server error";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Format a timestamp as an RFC 1123 HTTP date.
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// JSON body of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEnvelope {
    pub status: u16,
    pub message: String,
    pub error: String,
}

/// Whether the response body came from the store or was just rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// A fully assembled response.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub version: Option<Version>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    /// `304 Not Modified` with no body, echoing the request's HTTP version.
    pub fn not_modified(version: Version) -> Self {
        Self {
            status: StatusCode::NOT_MODIFIED,
            version: Some(version),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// `200 OK` with a PNG body and the long-lived cache headers.
    pub fn image(
        data: Bytes,
        etag: &str,
        last_modified: SystemTime,
        cache_status: CacheStatus,
        max_age: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let expires = now
            .checked_add_signed(Duration::seconds(i64::from(max_age)))
            .unwrap_or(now);

        let mut headers = HeaderMap::new();
        insert(
            &mut headers,
            CACHE_CONTROL,
            format!("max-age={}, must-revalidate", max_age),
        );
        insert(
            &mut headers,
            LAST_MODIFIED,
            http_date(DateTime::<Utc>::from(last_modified)),
        );
        insert(&mut headers, EXPIRES, http_date(expires));
        insert(&mut headers, ETAG, etag.to_string());
        headers.insert(X_CDN_CACHE, HeaderValue::from_static(cache_status.as_str()));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(PNG_CONTENT_TYPE));

        Self {
            status: StatusCode::OK,
            version: None,
            headers,
            body: data,
        }
    }

    /// Error response with no-cache headers and a JSON envelope.
    ///
    /// Client errors carry their own text; everything else is a 500 with a
    /// generic text.
    pub fn failure(error: &BarcodeError, now: DateTime<Utc>) -> Self {
        let (status, text) = if error.is_client_error() {
            (StatusCode::BAD_REQUEST, error.to_string())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_TEXT.to_string(),
            )
        };

        let envelope = FailureEnvelope {
            status: status.as_u16(),
            message: FAILURE_MESSAGE.to_string(),
            error: text,
        };
        let body = serde_json::to_vec(&envelope).unwrap_or_default();

        let mut headers = HeaderMap::new();
        headers.insert(EXPIRES, HeaderValue::from_static(EXPIRED_DATE));
        insert(&mut headers, LAST_MODIFIED, http_date(now));
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        );
        headers.append(
            CACHE_CONTROL,
            HeaderValue::from_static("post-check=0, pre-check=0"),
        );
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(X_CDN_CACHE, HeaderValue::from_static(CacheStatus::Miss.as_str()));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        Self {
            status,
            version: None,
            headers,
            body: Bytes::from(body),
        }
    }

    pub fn cache_status(&self) -> Option<&str> {
        self.headers.get(X_CDN_CACHE).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(version) = self.version {
            *response.version_mut() = version;
        }
        *response.headers_mut() = self.headers;
        response
    }
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: String) {
    if let Ok(value) = HeaderValue::try_from(value) {
        headers.insert(name, value);
    }
}

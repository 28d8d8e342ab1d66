//! API integration tests for barcode retrieval and error handling.
//!
//! Tests verify:
//! - PNG responses and the cache-header contract
//! - Path parameter handling (sanitization, optional dimensions)
//! - Error envelopes for bad input
//! - Health check, HEAD and CORS

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use tower::ServiceExt;

use barcode_server::HealthResponse;

use super::test_utils::{
    body_bytes, etag_for, get, header, is_valid_png, png_dimensions, test_router,
};

// =============================================================================
// Successful Rendering
// =============================================================================

#[tokio::test]
async fn test_barcode_success() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST123", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "image/png");
    assert_eq!(
        header(&response, "cache-control"),
        "max-age=31536000, must-revalidate"
    );
    assert_eq!(
        header(&response, "etag"),
        etag_for("BARCODE-TEST123-x.png")
    );
    assert_eq!(header(&response, "x-cdn-cache"), "MISS");
    assert!(header(&response, "last-modified").ends_with(" GMT"));
    assert!(header(&response, "expires").ends_with(" GMT"));

    let body = body_bytes(response).await;
    assert!(is_valid_png(&body), "Response should be a valid PNG");

    let (width, height) = png_dimensions(&body);
    assert_eq!(height, 60);
    assert!(width > 150 && width < 250, "unexpected width {}", width);
}

#[tokio::test]
async fn test_input_is_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/test-123", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "etag"),
        etag_for("BARCODE-TEST123-x.png")
    );
}

#[tokio::test]
async fn test_resize_to_requested_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST123/100/30", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "etag"),
        etag_for("BARCODE-TEST123-100x30.png")
    );
    let body = body_bytes(response).await;
    assert_eq!(png_dimensions(&body), (100, 30));
}

#[tokio::test]
async fn test_width_only() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST123/100", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert_eq!(png_dimensions(&body), (100, 60));
}

#[tokio::test]
async fn test_never_upscales() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let natural = body_bytes(get(&router, "/barcode/TEST123", None).await).await;
    let large = body_bytes(get(&router, "/barcode/TEST123/5000/500", None).await).await;

    assert_eq!(png_dimensions(&large), png_dimensions(&natural));
}

#[tokio::test]
async fn test_zero_dimension_means_unspecified() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST123/0/0", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "etag"),
        etag_for("BARCODE-TEST123-x.png")
    );
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_empty_code_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/%23%23%23", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, "content-type"), "application/json");
    assert_eq!(header(&response, "x-cdn-cache"), "MISS");
    assert_eq!(header(&response, "pragma"), "no-cache");
    assert_eq!(header(&response, "expires"), "Mon, 26 Jul 1997 05:00:00 GMT");

    let cache_control: Vec<_> = response
        .headers()
        .get_all("cache-control")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        cache_control,
        vec![
            "no-store, no-cache, must-revalidate".to_string(),
            "post-check=0, pre-check=0".to_string(),
        ]
    );
    assert!(response.headers().get("etag").is_none());

    let body = body_bytes(response).await;
    assert_eq!(
        &body[..],
        br#"{"status":400,"message":"Failed to generate barcode.","error":"String cannot be empty"}"#
    );

    // Nothing was cached
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_invalid_width_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST123/abc", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["message"], "Failed to generate barcode.");
    assert_eq!(body["error"], "Invalid width: abc");
}

#[tokio::test]
async fn test_invalid_height_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST123/100/-5", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "Invalid height: -5");
}

#[tokio::test]
async fn test_undecodable_bytes_are_stripped() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST%FF123", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "image/png");
    assert_eq!(header(&response, "x-cdn-cache"), "MISS");
    assert_eq!(
        header(&response, "etag"),
        etag_for("BARCODE-TEST123-x.png")
    );
}

#[tokio::test]
async fn test_only_undecodable_bytes_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/%FF", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, "content-type"), "application/json");
    assert_eq!(header(&response, "x-cdn-cache"), "MISS");
    assert_eq!(header(&response, "pragma"), "no-cache");

    let body = body_bytes(response).await;
    assert_eq!(
        &body[..],
        br#"{"status":400,"message":"Failed to generate barcode.","error":"String cannot be empty"}"#
    );
}

#[tokio::test]
async fn test_undecodable_width_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST%FF/%FF", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "Invalid width: \u{FFFD}");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/TEST123/1/2/3", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health, HEAD and CORS
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.status, "healthy");
    assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_head_request_has_headers_but_no_body() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/barcode/TEST123")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "image/png");
    assert_eq!(
        header(&response, "etag"),
        etag_for("BARCODE-TEST123-x.png")
    );
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_cors_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let request = Request::builder()
        .uri("/health")
        .header("origin", "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "access-control-allow-origin"), "*");
}

#[tokio::test]
async fn test_cors_leaves_not_modified_intact() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());
    let etag = etag_for("BARCODE-TEST123-x.png");

    let request = Request::builder()
        .uri("/barcode/TEST123")
        .header("origin", "https://example.com")
        .header("if-none-match", &etag)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(header(&response, "access-control-allow-origin"), "*");
    for name in [
        "etag",
        "cache-control",
        "expires",
        "last-modified",
        "x-cdn-cache",
        "content-type",
    ] {
        assert!(response.headers().get(name).is_none(), "unexpected {}", name);
    }
    assert!(body_bytes(response).await.is_empty());
}

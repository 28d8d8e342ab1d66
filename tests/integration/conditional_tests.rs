//! Conditional GET tests.

use axum::http::StatusCode;

use super::test_utils::{body_bytes, etag_for, get, header, test_router};

#[tokio::test]
async fn test_matching_etag_returns_304() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let first = get(&router, "/barcode/TEST123", None).await;
    let etag = header(&first, "etag").to_string();
    body_bytes(first).await;

    let response = get(&router, "/barcode/TEST123", Some(&etag)).await;

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(response.headers().get("x-cdn-cache").is_none());
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_etag_is_hash_of_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let etag = etag_for("BARCODE-TEST123-100x30.png");
    let first = get(&router, "/barcode/TEST123/100/30", None).await;
    assert_eq!(header(&first, "etag"), etag);

    let response = get(&router, "/barcode/TEST123/100/30", Some(&etag)).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_validator_checked_before_store() {
    let dir = tempfile::tempdir().unwrap();
    let (router, face) = test_router(dir.path());

    let etag = etag_for("BARCODE-NEVERSEEN-x.png");
    let response = get(&router, "/barcode/NEVERSEEN", Some(&etag)).await;

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(face.outline_count(), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_mismatched_etag_serves_image() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let other = etag_for("BARCODE-OTHER-x.png");
    let response = get(&router, "/barcode/TEST123", Some(&other)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cdn-cache"), "MISS");
}

#[tokio::test]
async fn test_etag_must_match_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());
    let etag = etag_for("BARCODE-TEST123-x.png");

    let unquoted = etag.trim_matches('"').to_string();
    let response = get(&router, "/barcode/TEST123", Some(&unquoted)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let weak = format!("W/{}", etag);
    let response = get(&router, "/barcode/TEST123", Some(&weak)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_code_fails_even_with_validator() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = test_router(dir.path());

    let response = get(&router, "/barcode/%21%21%21", Some("\"anything\"")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

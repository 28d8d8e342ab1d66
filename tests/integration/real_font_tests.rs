//! Rendering tests against real font files.
//!
//! # Requirements
//!
//! Point these variables at a barcode-style font and a plain font:
//! ```bash
//! export BARCODE_TEST_BARCODE_FONT=/path/to/FRE3OF9X.TTF
//! export BARCODE_TEST_PLAIN_FONT=/path/to/DejaVuSans.ttf
//! ```
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --test integration real_font -- --ignored
//! ```

use std::env;
use std::sync::Arc;

use axum::http::StatusCode;

use barcode_server::{
    create_router, BarcodeGenerator, FsCacheStore, RouterConfig, TtfFace,
};

use super::test_utils::{body_bytes, get, header, is_valid_png, png_dimensions};

fn real_generator() -> BarcodeGenerator {
    let barcode_path = env::var("BARCODE_TEST_BARCODE_FONT")
        .expect("BARCODE_TEST_BARCODE_FONT must point at a font file");
    let plain_path = env::var("BARCODE_TEST_PLAIN_FONT")
        .expect("BARCODE_TEST_PLAIN_FONT must point at a font file");

    let barcode = TtfFace::from_file(&barcode_path).expect("Failed to load barcode font");
    let plain = TtfFace::from_file(&plain_path).expect("Failed to load plain font");
    BarcodeGenerator::from_faces(Arc::new(barcode), Arc::new(plain))
}

#[test]
#[ignore = "requires BARCODE_TEST_BARCODE_FONT and BARCODE_TEST_PLAIN_FONT"]
fn test_real_fonts_render_deterministically() {
    let generator = real_generator();

    let first = generator.png("TEST123", None, None).unwrap();
    let second = generator.png("TEST123", None, None).unwrap();
    assert_eq!(first, second);
    assert!(is_valid_png(&first));

    let (width, height) = png_dimensions(&first);
    assert_eq!(height, 60);
    assert!(width > 1 && width <= 2000);
}

#[test]
#[ignore = "requires BARCODE_TEST_BARCODE_FONT and BARCODE_TEST_PLAIN_FONT"]
fn test_real_fonts_resize() {
    let generator = real_generator();
    let image = generator.generate("TEST123", Some(100), Some(30)).unwrap();
    assert_eq!(image.dimensions(), (100, 30));
}

#[tokio::test]
#[ignore = "requires BARCODE_TEST_BARCODE_FONT and BARCODE_TEST_PLAIN_FONT"]
async fn test_real_fonts_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let router = create_router(
        FsCacheStore::new(dir.path()),
        real_generator(),
        RouterConfig::new().with_tracing(false),
    );

    let response = get(&router, "/barcode/HELLO42", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cdn-cache"), "MISS");
    assert!(is_valid_png(&body_bytes(response).await));

    let response = get(&router, "/barcode/HELLO42", None).await;
    assert_eq!(header(&response, "x-cdn-cache"), "HIT");
}

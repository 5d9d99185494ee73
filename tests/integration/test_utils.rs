//! Test utilities for integration tests.
//!
//! This module provides stub engines, multipart body builders and helpers for
//! driving the router in-process.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

use image_classifier::{ClassificationEngine, EngineError, ImageType, Label};

/// Boundary used by every multipart body built here.
pub const BOUNDARY: &str = "X-CLASSIFIER-TEST-BOUNDARY";

// =============================================================================
// Stub Engines
// =============================================================================

/// An engine that returns a fixed label list and records what it was given.
pub struct StubEngine {
    labels: Vec<Label>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(Vec<u8>, ImageType)>>,
}

impl StubEngine {
    pub fn new(labels: Vec<Label>) -> Self {
        Self {
            labels,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(Vec<u8>, ImageType)> {
        self.seen.lock().unwrap().clone()
    }
}

impl ClassificationEngine for StubEngine {
    fn classify(&self, image: &[u8], image_type: ImageType) -> Result<Vec<Label>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((image.to_vec(), image_type));
        Ok(self.labels.clone())
    }
}

/// An engine that always fails.
pub struct FailingEngine;

impl ClassificationEngine for FailingEngine {
    fn classify(&self, _: &[u8], _: ImageType) -> Result<Vec<Label>, EngineError> {
        Err(EngineError::Inference("stub failure".to_string()))
    }
}

/// An engine whose single label is the UTF-8 text of the image bytes.
///
/// Lets concurrent tests check that each response was computed from its own
/// request body.
pub struct EchoEngine;

impl ClassificationEngine for EchoEngine {
    fn classify(&self, image: &[u8], _: ImageType) -> Result<Vec<Label>, EngineError> {
        std::thread::sleep(std::time::Duration::from_millis(2));
        let text = String::from_utf8_lossy(image).into_owned();
        Ok(vec![Label::new(text, 1.0)])
    }
}

/// An engine that sleeps longer than any reasonable test deadline.
pub struct SlowEngine;

impl ClassificationEngine for SlowEngine {
    fn classify(&self, _: &[u8], _: ImageType) -> Result<Vec<Label>, EngineError> {
        std::thread::sleep(std::time::Duration::from_millis(500));
        Ok(vec![])
    }
}

// =============================================================================
// Multipart Builders
// =============================================================================

/// One part of a multipart/form-data body.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, filename: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            filename: Some(filename),
            data,
        }
    }

    pub fn text(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            filename: None,
            data,
        }
    }
}

/// Encode parts as a multipart/form-data body using [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Build a `POST /recognize` request from multipart parts.
pub fn recognize_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recognize")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// Build a `POST /recognize` request with a single `image` file part.
pub fn upload_request(filename: &str, data: &[u8]) -> Request<Body> {
    recognize_request(&[Part::file("image", filename, data)])
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Send a request through the router and decode the JSON body.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();

    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

// =============================================================================
// Image Fixtures
// =============================================================================

/// Encode a solid-color RGB image.
pub fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// A 1×1 PNG.
pub fn create_test_png() -> Vec<u8> {
    create_test_image(1, 1, ImageFormat::Png)
}

/// Check if data starts with the PNG signature.
pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
}

/// Wrap an engine for use with `create_router`.
pub fn shared<E: ClassificationEngine>(engine: E) -> Arc<E> {
    Arc::new(engine)
}

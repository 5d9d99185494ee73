//! Concurrent request tests.
//!
//! Many uploads run against one shared engine at the same time; each response
//! must be built only from its own request.

use std::collections::HashSet;

use axum::http::StatusCode;
use image_classifier::{create_router, RouterConfig};

use super::test_utils::{send, shared, upload_request, EchoEngine, StubEngine};

const REQUESTS: usize = 64;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_do_not_mix() {
    let router = create_router(shared(EchoEngine), RouterConfig::default());

    let mut handles = Vec::with_capacity(REQUESTS);
    for i in 0..REQUESTS {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let filename = format!("upload-{}.png", i);
            let payload = format!("payload-{}", i);
            let (status, json) = send(router, upload_request(&filename, payload.as_bytes())).await;
            (i, status, json)
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let (i, status, json) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["filename"], format!("upload-{}.png", i));
        assert_eq!(json["labels"][0]["label"], format!("payload-{}", i));
        assert!(seen.insert(i));
    }

    assert_eq!(seen.len(), REQUESTS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_engine_shared_across_requests() {
    let engine = shared(StubEngine::new(vec![]));
    let router = create_router(engine.clone(), RouterConfig::default());

    let handles: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let router = router.clone();
            tokio::spawn(async move {
                let filename = format!("{}.jpg", i);
                send(router, upload_request(&filename, &[i as u8])).await.0
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    // Each request reached the engine exactly once with its own bytes
    assert_eq!(engine.call_count(), REQUESTS);
    let bytes: HashSet<u8> = engine.seen().into_iter().map(|(data, _)| data[0]).collect();
    assert_eq!(bytes.len(), REQUESTS);
}

//! Request logging middleware.
//!
//! [`log_requests`] is an axum `from_fn` middleware, so it wraps any router,
//! nested router or single handler:
//!
//! ```ignore
//! use axum::{middleware, routing::post, Router};
//!
//! let router = Router::new()
//!     .route("/recognize", post(handler))
//!     .layer(middleware::from_fn(log_requests));
//! ```
//!
//! It records the wall-clock time and path before delegating and never
//! touches the request or response.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use chrono::Local;
use tracing::{debug, info};

/// Timestamp layout used in request log lines, e.g. `Mon Jan 2 15:04:05 2006`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y";

/// Log the arrival time and path of every request, then run the inner service.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let received_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    info!(%method, %path, "{} - {}", received_at, path);

    let started = Instant::now();
    let response = next.run(request).await;

    debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request finished"
    );

    response
}

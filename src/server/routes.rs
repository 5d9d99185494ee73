//! Router configuration for the image classifier.
//!
//! # Route Structure
//!
//! ```text
//! POST /recognize    - Classify an uploaded image (multipart field "image")
//! GET  /health       - Health check
//! ```
//!
//! Every route runs behind [`log_requests`]; CORS and `tower_http` tracing
//! are applied on top according to [`RouterConfig`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use image_classifier::engine::TensorFlowEngine;
//! use image_classifier::server::routes::{create_router, RouterConfig};
//!
//! let engine = TensorFlowEngine::load("graph.pb", "labels.txt")?;
//! let router = create_router(Arc::new(engine), RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{classify_handler, health_handler, AppState};
use super::logging::log_requests;
use crate::engine::ClassificationEngine;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Maximum request body size in bytes (None = unlimited)
    pub max_upload_bytes: Option<usize>,

    /// Deadline for a single inference call (None = no deadline)
    pub inference_timeout: Option<Duration>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    /// By default:
    /// - CORS allows any origin
    /// - Uploads are unbounded
    /// - Inference has no deadline
    /// - Tracing is enabled
    fn default() -> Self {
        Self {
            cors_origins: None,
            max_upload_bytes: None,
            inference_timeout: None,
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Cap the request body size. Larger uploads are rejected as unreadable.
    pub fn with_max_upload_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// Bound each inference call by a deadline.
    pub fn with_inference_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.inference_timeout = timeout;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router around a loaded engine.
///
/// The engine is shared by every request through [`AppState`]; it is never
/// mutated after this call.
pub fn create_router<E>(engine: Arc<E>, config: RouterConfig) -> Router
where
    E: ClassificationEngine + 'static,
{
    let app_state = AppState::new(engine).with_inference_timeout(config.inference_timeout);

    let body_limit = match config.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let router = Router::new()
        .route("/recognize", post(classify_handler::<E>))
        .layer(body_limit)
        .route("/health", get(health_handler))
        .with_state(app_state)
        .layer(middleware::from_fn(log_requests))
        .layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

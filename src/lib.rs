//! # Image Classifier
//!
//! An HTTP service that classifies uploaded images with a pre-trained
//! image-recognition model.
//!
//! Clients `POST` a multipart form with a file field named `image` to
//! `/recognize` and receive the original file name together with the labels
//! the model ranked highest:
//!
//! ```text
//! {"filename": "cat.png", "labels": [{"label": "tabby", "confidence": 0.87}, ...]}
//! ```
//!
//! ## Architecture
//!
//! - [`image_type`] - Maps upload file names to supported image encodings
//! - [`engine`] - Classification engine trait and the TensorFlow implementation
//! - [`server`] - Axum handlers, request logging middleware, JSON responses, routes
//! - [`error`] - Error taxonomy and its HTTP mapping
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use image_classifier::{create_router, RouterConfig, TensorFlowEngine};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = TensorFlowEngine::load("model/graph.pb", "model/labels.txt")
//!         .expect("model should load");
//!     let router = create_router(Arc::new(engine), RouterConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod image_type;
pub mod server;

// Re-export commonly used types
pub use config::{Cli, ClassifyConfig, Command, ModelConfig, ServeConfig};
pub use engine::{
    rank_labels, ClassificationEngine, Label, TensorFlowEngine, DEFAULT_TOP_K, UNKNOWN_LABEL,
};
pub use error::{ClassifyError, EngineError, ImageTypeError};
pub use image_type::{extension_of, ImageType};
pub use server::{
    classify_handler, create_router, health_handler, log_requests, AppState, ClassifyResponse,
    ErrorResponse, HealthResponse, RouterConfig, UploadedImage,
};

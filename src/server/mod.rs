//! HTTP server layer for the image classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                      POST /recognize                            │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌────────┐  │
//! │  │  handlers   │  │   logging   │  │  response   │  │ routes │  │
//! │  │ (upload →   │  │ (middleware)│  │   (JSON     │  │        │  │
//! │  │  engine)    │  │             │  │   bodies)   │  │        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  └────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod logging;
pub mod response;
pub mod routes;

pub use handlers::{
    classify_handler, health_handler, read_upload, AppState, UploadedImage, IMAGE_FIELD,
};
pub use logging::log_requests;
pub use response::{ClassifyResponse, ErrorResponse, HealthResponse};
pub use routes::{create_router, RouterConfig};

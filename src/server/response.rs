//! JSON response bodies for the classification API.
//!
//! Every response is `application/json`: a [`ClassifyResponse`] with status 200
//! or an [`ErrorResponse`] carrying the status of the [`ClassifyError`] that
//! produced it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::engine::Label;
use crate::error::ClassifyError;

/// Successful classification of one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Original name of the uploaded file
    pub filename: String,

    /// Labels in the order the engine ranked them
    pub labels: Vec<Label>,
}

impl IntoResponse for ClassifyResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short, human-readable message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Pair this body with a status code.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Convert ClassifyError to HTTP response.
///
/// 5xx errors are logged at ERROR level, 4xx at WARN. The internal detail is
/// only logged; the body carries the fixed public message.
impl IntoResponse for ClassifyError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(
                error_type = self.kind(),
                status = status.as_u16(),
                "Server error: {}",
                self
            );
        } else {
            warn!(
                error_type = self.kind(),
                status = status.as_u16(),
                "Client error: {}",
                self
            );
        }

        ErrorResponse::new(self.public_message()).with_status(status)
    }
}

//! HTTP request handlers for the image classification API.
//!
//! # Endpoints
//!
//! - `POST /recognize` - Classify the image uploaded in the multipart field `image`
//! - `GET /health` - Health check endpoint

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::debug;

use crate::engine::{ClassificationEngine, Label};
use crate::error::{ClassifyError, EngineError};
use crate::image_type::{extension_of, ImageType};

use super::response::{ClassifyResponse, HealthResponse};

/// Name of the multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the classification engine.
///
/// The engine is loaded once at startup and only ever read afterwards.
pub struct AppState<E: ClassificationEngine> {
    /// The loaded model
    pub engine: Arc<E>,

    /// Deadline for a single inference call (None = wait indefinitely)
    pub inference_timeout: Option<Duration>,
}

impl<E: ClassificationEngine + 'static> AppState<E> {
    /// Create a new application state around a loaded engine.
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            inference_timeout: None,
        }
    }

    /// Bound every inference call by the given deadline.
    pub fn with_inference_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.inference_timeout = timeout;
        self
    }

    /// Run the engine on a blocking worker thread.
    ///
    /// A panicking engine and an elapsed deadline both surface as engine errors.
    pub async fn run_inference(
        &self,
        data: Bytes,
        image_type: ImageType,
    ) -> Result<Vec<Label>, EngineError> {
        let engine = Arc::clone(&self.engine);
        let task = tokio::task::spawn_blocking(move || engine.classify(&data, image_type));

        let joined = match self.inference_timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| EngineError::Timeout { limit })?,
            None => task.await,
        };

        joined.map_err(|e| EngineError::Inference(format!("inference task failed: {}", e)))?
    }
}

impl<E: ClassificationEngine> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            inference_timeout: self.inference_timeout,
        }
    }
}

// =============================================================================
// Upload Extraction
// =============================================================================

/// An image upload buffered from the request body.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// File name as declared by the client
    pub filename: String,

    /// Lowercased text after the last `.` of the file name
    pub extension: String,

    /// Entire file body
    pub data: Bytes,
}

/// Find the `image` field and buffer it completely.
///
/// Fields before it are skipped. Fails with [`ClassifyError::ClientInput`] if
/// the field is missing, has no file name, has a file name without an
/// extension, or its body cannot be read.
pub async fn read_upload(multipart: &mut Multipart) -> Result<UploadedImage, ClassifyError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ClassifyError::ClientInput(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ClassifyError::ClientInput("image field has no file name".into()))?;

        let extension = extension_of(&filename)
            .map(str::to_lowercase)
            .ok_or_else(|| {
                ClassifyError::ClientInput(format!("file name has no extension: {}", filename))
            })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ClassifyError::ClientInput(format!("could not read image body: {}", e)))?;

        return Ok(UploadedImage {
            filename,
            extension,
            data,
        });
    }

    Err(ClassifyError::ClientInput(format!(
        "missing multipart field '{}'",
        IMAGE_FIELD
    )))
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image classification requests.
///
/// # Response
///
/// - 200 with `{"filename", "labels"}` on success
/// - 400 if the upload cannot be read
/// - 415 if the file name does not end in png, jpg or jpeg
/// - 500 if the engine fails
pub async fn classify_handler<E: ClassificationEngine + 'static>(
    State(state): State<AppState<E>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ClassifyResponse, ClassifyError> {
    let mut multipart = multipart
        .map_err(|e| ClassifyError::ClientInput(format!("not a multipart request: {}", e)))?;

    let upload = read_upload(&mut multipart).await?;
    let image_type = ImageType::from_name(&upload.extension)?;

    debug!(
        filename = %upload.filename,
        bytes = upload.data.len(),
        "Try to classify image of type {}",
        image_type
    );

    let labels = state.run_inference(upload.data, image_type).await?;

    for label in &labels {
        debug!(confidence = label.confidence, "{}", label.label);
    }

    Ok(ClassifyResponse {
        filename: upload.filename,
        labels,
    })
}

/// Health check endpoint.
///
/// Returns 200 once the model is loaded, which is always the case for a
/// running server since startup fails without one.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================

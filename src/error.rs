use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

/// Message returned when the upload cannot be extracted from the request.
pub const MSG_COULD_NOT_READ_IMAGE: &str = "Could not read image";

/// Message returned when the upload's extension is not a supported image type.
pub const MSG_UNSUPPORTED_IMAGE_TYPE: &str = "Unsupported image type";

/// Message returned when the classification engine fails.
pub const MSG_COULD_NOT_RUN_INFERENCE: &str = "Could not run inference";

/// Message for a model that failed to load.
pub const MSG_COULD_NOT_LOAD_MODEL: &str = "Could not load model";

/// Errors produced while resolving an image type from a file name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageTypeError {
    /// Name does not end with a supported image suffix (should map to HTTP 415)
    #[error("Unsupported image type: {name}")]
    Unsupported { name: String },
}

/// Errors raised by a classification engine
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Model graph or label vocabulary could not be loaded
    #[error("Failed to load model: {0}")]
    Load(String),

    /// Image bytes could not be decoded in the declared format
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Running the model failed
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Inference did not finish before the configured deadline
    #[error("Inference timed out after {limit:?}")]
    Timeout { limit: Duration },
}

/// Closed error taxonomy for the classification pipeline.
///
/// Each variant carries an internal detail string that is logged but never
/// returned to the caller; the caller only sees [`ClassifyError::public_message`].
#[derive(Debug, Clone, Error)]
pub enum ClassifyError {
    /// Missing or unreadable upload, malformed multipart body
    #[error("Client input error: {0}")]
    ClientInput(String),

    /// Upload extension is not png, jpg or jpeg
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Engine rejected the image or failed internally
    #[error("Engine failure: {0}")]
    EngineFailure(String),

    /// Engine could not be loaded at startup
    #[error("Startup failure: {0}")]
    StartupFailure(String),
}

impl ClassifyError {
    /// HTTP status code for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ClassifyError::ClientInput(_) => StatusCode::BAD_REQUEST,
            ClassifyError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ClassifyError::EngineFailure(_) | ClassifyError::StartupFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Fixed, caller-facing message for this error kind.
    pub fn public_message(&self) -> &'static str {
        match self {
            ClassifyError::ClientInput(_) => MSG_COULD_NOT_READ_IMAGE,
            ClassifyError::UnsupportedType(_) => MSG_UNSUPPORTED_IMAGE_TYPE,
            ClassifyError::EngineFailure(_) => MSG_COULD_NOT_RUN_INFERENCE,
            ClassifyError::StartupFailure(_) => MSG_COULD_NOT_LOAD_MODEL,
        }
    }

    /// Short identifier used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::ClientInput(_) => "client_input",
            ClassifyError::UnsupportedType(_) => "unsupported_type",
            ClassifyError::EngineFailure(_) => "engine_failure",
            ClassifyError::StartupFailure(_) => "startup_failure",
        }
    }
}

impl From<ImageTypeError> for ClassifyError {
    fn from(err: ImageTypeError) -> Self {
        ClassifyError::UnsupportedType(err.to_string())
    }
}

impl From<EngineError> for ClassifyError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Load(_) => ClassifyError::StartupFailure(err.to_string()),
            _ => ClassifyError::EngineFailure(err.to_string()),
        }
    }
}

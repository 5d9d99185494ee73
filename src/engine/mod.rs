//! Classification engine abstraction.
//!
//! The HTTP layer only depends on the [`ClassificationEngine`] trait, so any
//! model runtime (or a stub in tests) can sit behind it:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            classify_handler             │
//! └────────────────────┬────────────────────┘
//!                      │ Arc<E>
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │       ClassificationEngine Trait        │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            TensorFlowEngine             │
//! │  (frozen graph + label vocabulary)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Engines are loaded once at startup and shared read-only by every request.
//! `classify` takes `&self`, so an implementation must be safe to call from
//! many threads at once without external locking.

mod labels;
mod tensorflow;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::image_type::ImageType;

pub use labels::{load_vocabulary, rank_labels, DEFAULT_TOP_K, UNKNOWN_LABEL};
pub use tensorflow::{TensorFlowEngine, INPUT_SIZE, PIXEL_MEAN, PIXEL_SCALE};

/// A single classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Human-readable category name
    pub label: String,

    /// Model confidence for this category
    pub confidence: f32,
}

impl Label {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A loaded image-recognition model.
pub trait ClassificationEngine: Send + Sync {
    /// Classify an encoded image.
    ///
    /// Returns labels ranked by confidence, highest first. Callers must not
    /// reorder or filter the result.
    fn classify(&self, image: &[u8], image_type: ImageType) -> Result<Vec<Label>, EngineError>;
}

//! TensorFlow frozen-graph engine backed by tract.
//!
//! Expects an Inception-style graph taking a single `f32 [1, 224, 224, 3]`
//! NHWC input and producing one score per vocabulary entry on its `output`
//! node.
//!
//! # Preprocessing
//!
//! - Decode with the format implied by the upload's [`ImageType`]
//! - Resize to 224×224 (bilinear), drop alpha
//! - Normalize each channel as `(v - PIXEL_MEAN) / PIXEL_SCALE`

use std::path::Path;

use image::imageops::FilterType;
use tracing::{debug, info};
use tract_tensorflow::prelude::*;

use crate::error::EngineError;
use crate::image_type::ImageType;

use super::labels::{load_vocabulary, rank_labels, DEFAULT_TOP_K};
use super::{ClassificationEngine, Label};

/// Width and height of the model input.
pub const INPUT_SIZE: u32 = 224;

/// Value subtracted from each channel before inference.
pub const PIXEL_MEAN: f32 = 117.0;

/// Divisor applied to each channel after mean subtraction.
pub const PIXEL_SCALE: f32 = 1.0;

/// Name of the graph node holding class scores.
const OUTPUT_NODE: &str = "output";

type Plan = TypedRunnableModel<TypedModel>;

/// Image classifier running a TensorFlow frozen graph.
///
/// The runnable plan is immutable after loading; each `classify` call builds
/// its own execution state, so the engine is shared across requests as-is.
pub struct TensorFlowEngine {
    plan: Plan,
    vocabulary: Vec<String>,
    top_k: usize,
}

impl TensorFlowEngine {
    /// Load the graph and label vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Load`] if either file is unreadable, the label
    /// file is empty, or the graph cannot be typed and optimized for the
    /// expected input shape.
    pub fn load(
        graph_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
    ) -> Result<Self, EngineError> {
        let graph_path = graph_path.as_ref();
        let vocabulary = load_vocabulary(labels_path)?;

        let size = INPUT_SIZE as usize;
        let plan = tract_tensorflow::tensorflow()
            .model_for_path(graph_path)
            .and_then(|model| model.with_output_names([OUTPUT_NODE]))
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, size, size, 3)),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| EngineError::Load(format!("{}: {}", graph_path.display(), e)))?;

        info!(
            graph = %graph_path.display(),
            labels = vocabulary.len(),
            "Model loaded"
        );

        Ok(Self {
            plan,
            vocabulary,
            top_k: DEFAULT_TOP_K,
        })
    }

    /// Set how many labels each classification returns.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

impl ClassificationEngine for TensorFlowEngine {
    fn classify(&self, image: &[u8], image_type: ImageType) -> Result<Vec<Label>, EngineError> {
        let input = image_to_tensor(image, image_type)?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| EngineError::Inference(e.to_string()))?;

        let scores = outputs
            .first()
            .ok_or_else(|| EngineError::Inference("model produced no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| EngineError::Inference(e.to_string()))?;
        let scores: Vec<f32> = scores.iter().copied().collect();

        debug!(scores = scores.len(), "Inference finished");

        Ok(rank_labels(&scores, &self.vocabulary, self.top_k))
    }
}

/// Decode and normalize an encoded image into an NHWC input tensor.
fn image_to_tensor(data: &[u8], image_type: ImageType) -> Result<Tensor, EngineError> {
    let decoded = image::load_from_memory_with_format(data, image_type.image_format())
        .map_err(|e| EngineError::Decode(e.to_string()))?;

    let resized = decoded
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();

    let size = INPUT_SIZE as usize;
    let array = tract_ndarray::Array4::from_shape_fn((1, size, size, 3), |(_, y, x, c)| {
        (resized[(x as u32, y as u32)][c] as f32 - PIXEL_MEAN) / PIXEL_SCALE
    });

    Ok(array.into_tensor())
}

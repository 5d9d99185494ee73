//! Label vocabulary loading and score ranking.

use std::path::Path;

use crate::error::EngineError;

use super::Label;

/// Default number of labels returned per classification.
pub const DEFAULT_TOP_K: usize = 5;

/// Label given to scores past the end of the vocabulary.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Load a label vocabulary with one label per line.
///
/// Lines are trimmed and blank lines are skipped. An empty vocabulary is an error.
pub fn load_vocabulary(path: impl AsRef<Path>) -> Result<Vec<String>, EngineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Load(format!("{}: {}", path.display(), e)))?;

    let vocabulary: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if vocabulary.is_empty() {
        return Err(EngineError::Load(format!(
            "{}: label file is empty",
            path.display()
        )));
    }

    Ok(vocabulary)
}

/// Pair the `top_k` highest scores with their vocabulary entries.
///
/// Ties keep index order. Graphs often emit a few more classes than their
/// label file lists (Inception5h: 1008 outputs, 1001 labels); those extra
/// scores rank normally under [`UNKNOWN_LABEL`].
pub fn rank_labels(scores: &[f32], vocabulary: &[String], top_k: usize) -> Vec<Label> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    indices
        .into_iter()
        .take(top_k)
        .map(|i| {
            let label = vocabulary
                .get(i)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            Label::new(label, scores[i])
        })
        .collect()
}

//! Embedding providers
//!
//! The ranker depends on a single operation: turn normalized text into a
//! fixed-length vector. `Model2VecProvider` is the production adapter; tests
//! plug in their own implementations.

use crate::error::{Result, ResumeRankerError};
use model2vec_rs::model::StaticModel;
use std::time::Instant;

/// Maps text to a fixed-dimensional vector.
///
/// Implementations must be deterministic for identical input over the life of
/// the process and must always return vectors of the same length.
pub trait EmbeddingProvider: Send + Sync + 'static {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Human-readable identifier for reports
    fn model_name(&self) -> &str;
}

/// Static Model2Vec embeddings, loaded once at startup and shared read-only
pub struct Model2VecProvider {
    model: StaticModel,
    model_name: String,
}

impl Model2VecProvider {
    /// Load from a local model directory or a HuggingFace repo id.
    /// Output vectors are unit length.
    pub fn load(repo_or_path: &str) -> Result<Self> {
        let start_time = Instant::now();
        log::info!("Loading Model2Vec embedding model from: {}", repo_or_path);

        let model = StaticModel::from_pretrained(
            repo_or_path,
            None,       // token
            Some(true), // normalize
            None,       // subfolder
        )
        .map_err(|e| ResumeRankerError::ModelLoading(format!("Failed to load model '{}': {}", repo_or_path, e)))?;

        log::info!("Model loaded successfully in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: repo_or_path.to_string(),
        })
    }
}

impl EmbeddingProvider for Model2VecProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        validate_embedding(&embedding)?;
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Reject vectors that cannot carry a meaningful similarity: empty, non-finite,
/// or all zeros (what a text made only of unknown tokens pools to).
pub fn validate_embedding(embedding: &[f32]) -> Result<()> {
    if embedding.is_empty() {
        return Err(ResumeRankerError::Embedding("model returned an empty vector".to_string()));
    }
    if embedding.iter().any(|v| !v.is_finite()) {
        return Err(ResumeRankerError::Embedding("vector contains non-finite values".to_string()));
    }
    if embedding.iter().all(|&v| v == 0.0) {
        return Err(ResumeRankerError::Embedding(
            "degenerate all-zero vector (no recognizable text)".to_string(),
        ));
    }
    Ok(())
}

/// Scale to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(embedding: &mut [f32]) {
    let norm = embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        embedding.iter_mut().for_each(|v| *v /= norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_degenerate_vectors() {
        assert!(matches!(validate_embedding(&[]), Err(ResumeRankerError::Embedding(_))));
        assert!(matches!(validate_embedding(&[0.0, 0.0]), Err(ResumeRankerError::Embedding(_))));
        assert!(matches!(validate_embedding(&[1.0, f32::NAN]), Err(ResumeRankerError::Embedding(_))));
        assert!(validate_embedding(&[0.0, 0.5]).is_ok());
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }

    #[test]
    fn test_model_loading_failure_is_reported() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // Directory exists but holds no tokenizer/model/config
        let result = Model2VecProvider::load(&temp_dir.path().to_string_lossy());
        assert!(matches!(result, Err(ResumeRankerError::ModelLoading(_))));
    }
}

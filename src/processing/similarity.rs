//! Similarity scoring between two embeddings
//!
//! The score is a plain dot product. It equals cosine similarity only when both
//! inputs are unit length; Model2Vec output is normalized at load time and the
//! engine re-normalizes when `processing.normalize_embeddings` is set. With
//! non-unit vectors the value is only a rank-consistent proxy.

use crate::error::{Result, ResumeRankerError};

/// Dot product of two equal-length vectors
pub fn score(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeRankerError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Similarity as a percentage rounded half away from zero to one decimal
pub fn to_percentage(similarity: f32) -> f64 {
    (f64::from(similarity) * 1000.0).round() / 10.0
}

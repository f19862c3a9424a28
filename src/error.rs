//! Error handling for the resume ranker

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeRankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pass-level failure raised before any candidate is touched.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Two embeddings of different length reached the scorer. The provider
    /// promised a fixed dimensionality, so this points at a misconfigured model.
    #[error("Embedding dimensions don't match: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Candidate timed out after {0:?}")]
    Timeout(Duration),

    #[error("Analysis cancelled before this candidate started")]
    Cancelled,

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    /// Broken internal invariant, such as a worker task that panicked
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ResumeRankerError>;

/// model2vec-rs reports failures through anyhow
impl From<anyhow::Error> for ResumeRankerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeRankerError::ModelLoading(err.to_string())
    }
}

//! Matching core: normalization, embeddings, scoring, gaps, and the engine

pub mod embeddings;
pub mod engine;
pub mod keyword_gaps;
pub mod results;
pub mod similarity;
pub mod text_normalizer;

pub use embeddings::{EmbeddingProvider, Model2VecProvider};
pub use engine::{CancellationFlag, EngineOptions, MatchEngine, PassObserver, PassState};
pub use keyword_gaps::KeywordGaps;
pub use results::{CandidateId, CandidateError, FailureKind, MatchResult, ResultSet, ScoreBand};

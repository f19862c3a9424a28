//! Batch matching engine
//!
//! One pass embeds the reference once, then runs every candidate through
//! extract → normalize → embed → score → gaps on a bounded worker pool.
//! Candidate failures become `MatchResult::Failed` entries; only precondition
//! violations and a failing reference abort the pass.

use crate::config::Config;
use crate::error::{Result, ResumeRankerError};
use crate::input::text_extractor::DocumentExtractor;
use crate::processing::embeddings::{l2_normalize, validate_embedding, EmbeddingProvider};
use crate::processing::keyword_gaps::gaps;
use crate::processing::results::{CandidateId, MatchResult, ResultSet};
use crate::processing::similarity::{score, to_percentage};
use crate::processing::text_normalizer::{normalize, TokenSet};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub max_workers: usize,
    pub candidate_timeout: Option<Duration>,
    pub normalize_embeddings: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_workers: 4,
            candidate_timeout: Some(Duration::from_secs(120)),
            normalize_embeddings: true,
        }
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_workers: config.processing.max_workers.max(1),
            candidate_timeout: config.candidate_timeout(),
            normalize_embeddings: config.processing.normalize_embeddings,
        }
    }
}

/// Lifecycle of a single pass, reported in this order. Between passes the
/// engine is idle and reports nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    ReferencePrepared,
    /// Candidate at this input index has started
    ProcessingCandidates(usize),
    Completed,
}

/// Progress hooks; called from worker tasks, so implementations must be thread safe
pub trait PassObserver: Send + Sync {
    fn on_state(&self, _state: PassState) {}

    fn on_candidate_finished(&self, _index: usize, _result: &MatchResult) {}
}

pub struct NoopObserver;

impl PassObserver for NoopObserver {}

/// Checked before each candidate starts. Candidates not yet started when the
/// flag is raised come back as `Cancelled` failures.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Read-only reference state shared by every candidate task
struct PreparedReference {
    embedding: Vec<f32>,
    tokens: TokenSet,
}

pub struct MatchEngine<E, X> {
    provider: Arc<E>,
    extractor: Arc<X>,
    options: EngineOptions,
}

impl<E, X> Clone for MatchEngine<E, X> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            extractor: Arc::clone(&self.extractor),
            options: self.options.clone(),
        }
    }
}

impl<E: EmbeddingProvider, X: DocumentExtractor> MatchEngine<E, X> {
    pub fn new(provider: Arc<E>, extractor: Arc<X>, options: EngineOptions) -> Self {
        Self {
            provider,
            extractor,
            options,
        }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Rank `candidates` against `reference_text`
    pub async fn analyze(&self, reference_text: &str, candidates: &[CandidateId]) -> Result<ResultSet> {
        self.analyze_with(
            reference_text,
            candidates,
            Arc::new(NoopObserver),
            &CancellationFlag::new(),
        )
        .await
    }

    pub async fn analyze_with(
        &self,
        reference_text: &str,
        candidates: &[CandidateId],
        observer: Arc<dyn PassObserver>,
        cancel: &CancellationFlag,
    ) -> Result<ResultSet> {
        let start_time = Instant::now();

        let reference = normalize(reference_text);
        if reference.is_empty() {
            return Err(ResumeRankerError::Precondition(
                "reference text is empty".to_string(),
            ));
        }
        if candidates.is_empty() {
            return Err(ResumeRankerError::Precondition(
                "no candidate documents supplied".to_string(),
            ));
        }

        info!(
            "Ranking {} candidates against a {}-character reference",
            candidates.len(),
            reference.text.len()
        );

        let reference = Arc::new(self.prepare_reference(reference.text, reference.tokens).await?);
        observer.on_state(PassState::ReferencePrepared);
        debug!(
            "Reference prepared: {} dimensions, {} tokens",
            reference.embedding.len(),
            reference.tokens.len()
        );

        let semaphore = Arc::new(Semaphore::new(self.options.max_workers.max(1)));
        let mut handles = Vec::with_capacity(candidates.len());

        for (index, id) in candidates.iter().enumerate() {
            let engine = self.clone();
            let reference = Arc::clone(&reference);
            let semaphore = Arc::clone(&semaphore);
            let observer = Arc::clone(&observer);
            let cancel = cancel.clone();
            let id = id.clone();

            handles.push(tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) if !cancel.is_cancelled() => {
                        observer.on_state(PassState::ProcessingCandidates(index));
                        engine.run_candidate(id, &reference).await
                    }
                    _ => MatchResult::failed(id, &ResumeRankerError::Cancelled),
                };
                observer.on_candidate_finished(index, &result);
                result
            }));
        }

        let mut outcomes = Vec::with_capacity(candidates.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Worker for '{}' crashed: {}", candidates[index], e);
                    let result = MatchResult::failed(
                        candidates[index].clone(),
                        &ResumeRankerError::Internal(format!("worker crashed: {}", e)),
                    );
                    observer.on_candidate_finished(index, &result);
                    result
                }
            };
            outcomes.push(result);
        }

        let results = ResultSet::rank(outcomes);
        observer.on_state(PassState::Completed);

        info!(
            "Pass completed in {:.2?}: {} scored, {} failed",
            start_time.elapsed(),
            results.scored_count(),
            results.failed_count()
        );

        Ok(results)
    }

    async fn prepare_reference(&self, text: String, tokens: TokenSet) -> Result<PreparedReference> {
        let embedding = self.embed(text).await.map_err(|e| {
            ResumeRankerError::Embedding(format!("failed to embed reference text: {}", e))
        })?;

        Ok(PreparedReference { embedding, tokens })
    }

    /// Run one candidate under the configured deadline and fold any error
    /// into a failed entry.
    async fn run_candidate(&self, id: CandidateId, reference: &PreparedReference) -> MatchResult {
        let outcome = match self.options.candidate_timeout {
            Some(limit) => tokio::time::timeout(limit, self.score_candidate(&id, reference))
                .await
                .unwrap_or(Err(ResumeRankerError::Timeout(limit))),
            None => self.score_candidate(&id, reference).await,
        };

        match outcome {
            Ok(result) => result,
            Err(err) => {
                if matches!(err, ResumeRankerError::DimensionMismatch { .. }) {
                    error!(
                        "Embedding provider '{}' broke its dimensionality contract on '{}': {}",
                        self.provider.model_name(),
                        id,
                        err
                    );
                } else {
                    warn!("Candidate '{}' failed: {}", id, err);
                }
                MatchResult::failed(id, &err)
            }
        }
    }

    async fn score_candidate(&self, id: &CandidateId, reference: &PreparedReference) -> Result<MatchResult> {
        let raw_text = self.extractor.extract(id).await?;

        let candidate = normalize(&raw_text);
        if candidate.is_empty() {
            return Err(ResumeRankerError::Extraction(format!(
                "'{}' contains no extractable text",
                id
            )));
        }

        let embedding = self.embed(candidate.text).await?;
        let similarity = score(&reference.embedding, &embedding)?;
        let missing_keywords = gaps(&reference.tokens, &candidate.tokens);

        debug!("'{}' similarity {:.4}", id, similarity);

        Ok(MatchResult::Scored {
            id: id.clone(),
            similarity,
            score: to_percentage(similarity),
            missing_keywords,
        })
    }

    /// Embedding is the expensive step; keep it off the async workers
    async fn embed(&self, text: String) -> Result<Vec<f32>> {
        let provider = Arc::clone(&self.provider);
        let mut embedding = tokio::task::spawn_blocking(move || provider.embed(&text))
            .await
            .map_err(|e| ResumeRankerError::Embedding(format!("embedding worker crashed: {}", e)))??;

        // Applies to every provider, not just the Model2Vec adapter
        validate_embedding(&embedding)?;
        if self.options.normalize_embeddings {
            l2_normalize(&mut embedding);
        }

        Ok(embedding)
    }
}

//! Per-candidate outcomes and the ranked result set

use crate::error::ResumeRankerError;
use crate::processing::keyword_gaps::KeywordGaps;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque handle resolvable by a `DocumentExtractor`; for files, the path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component, or the whole id when it has none
    pub fn display_name(&self) -> &str {
        Path::new(&self.0)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<&Path> for CandidateId {
    fn from(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }
}

/// Coarse display classification of a percentage score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub const STRONG_THRESHOLD: f64 = 75.0;
    pub const MODERATE_THRESHOLD: f64 = 50.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::STRONG_THRESHOLD {
            ScoreBand::Strong
        } else if score >= Self::MODERATE_THRESHOLD {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "strong",
            ScoreBand::Moderate => "moderate",
            ScoreBand::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Extraction,
    Embedding,
    DimensionMismatch,
    Timeout,
    Cancelled,
    Internal,
}

/// Structured candidate-level failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateError {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&ResumeRankerError> for CandidateError {
    fn from(err: &ResumeRankerError) -> Self {
        let kind = match err {
            ResumeRankerError::Extraction(_)
            | ResumeRankerError::UnsupportedFormat(_)
            | ResumeRankerError::Io(_)
            | ResumeRankerError::InvalidInput(_) => FailureKind::Extraction,
            ResumeRankerError::Embedding(_) => FailureKind::Embedding,
            ResumeRankerError::DimensionMismatch { .. } => FailureKind::DimensionMismatch,
            ResumeRankerError::Timeout(_) => FailureKind::Timeout,
            ResumeRankerError::Cancelled => FailureKind::Cancelled,
            _ => FailureKind::Internal,
        };

        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for CandidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    Scored {
        id: CandidateId,
        /// Raw dot-product similarity
        similarity: f32,
        /// Percentage rounded to one decimal; the ranking key
        score: f64,
        missing_keywords: KeywordGaps,
    },
    Failed {
        id: CandidateId,
        error: CandidateError,
    },
}

impl MatchResult {
    pub fn failed(id: CandidateId, err: &ResumeRankerError) -> Self {
        MatchResult::Failed {
            id,
            error: CandidateError::from(err),
        }
    }

    pub fn id(&self) -> &CandidateId {
        match self {
            MatchResult::Scored { id, .. } | MatchResult::Failed { id, .. } => id,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            MatchResult::Scored { score, .. } => Some(*score),
            MatchResult::Failed { .. } => None,
        }
    }

    pub fn band(&self) -> Option<ScoreBand> {
        self.score().map(ScoreBand::from_score)
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, MatchResult::Scored { .. })
    }
}

/// Ranked outcomes of one pass: scored entries by descending score (input
/// order on ties), then failed entries in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    results: Vec<MatchResult>,
}

impl ResultSet {
    /// Apply the ranking policy to outcomes given in candidate input order
    pub fn rank(outcomes: Vec<MatchResult>) -> Self {
        let (mut scored, failed): (Vec<_>, Vec<_>) =
            outcomes.into_iter().partition(MatchResult::is_scored);

        // Vec::sort_by is stable, which gives the input-order tie-break
        scored.sort_by(|a, b| {
            let a = a.score().unwrap_or(f64::NEG_INFINITY);
            let b = b.score().unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });

        scored.extend(failed);
        Self { results: scored }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn scored_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_scored()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.scored_count()
    }

    /// Reference serialization, in ranking order
    pub fn to_records(&self) -> Vec<ResultRecord> {
        self.results.iter().map(ResultRecord::from).collect()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a MatchResult;
    type IntoIter = std::slice::Iter<'a, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Scored,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: String,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub missing_keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl From<&MatchResult> for ResultRecord {
    fn from(result: &MatchResult) -> Self {
        match result {
            MatchResult::Scored {
                id,
                score,
                missing_keywords,
                ..
            } => ResultRecord {
                id: id.to_string(),
                status: RecordStatus::Scored,
                score: Some(*score),
                missing_keywords: Some(missing_keywords.keywords().to_vec()),
                error: None,
            },
            MatchResult::Failed { id, error } => ResultRecord {
                id: id.to_string(),
                status: RecordStatus::Error,
                score: None,
                missing_keywords: None,
                error: Some(error.message.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &str, score: f64) -> MatchResult {
        MatchResult::Scored {
            id: CandidateId::from(id),
            similarity: (score / 100.0) as f32,
            score,
            missing_keywords: KeywordGaps::NoneMissing,
        }
    }

    fn failed(id: &str) -> MatchResult {
        MatchResult::failed(
            CandidateId::from(id),
            &ResumeRankerError::Extraction("unreadable".to_string()),
        )
    }

    fn ids(set: &ResultSet) -> Vec<&str> {
        set.iter().map(|r| r.id().as_str()).collect()
    }

    #[test]
    fn test_rank_descending_with_failures_last() {
        let set = ResultSet::rank(vec![
            failed("broken-a"),
            scored("low", 40.0),
            scored("high", 90.5),
            failed("broken-b"),
            scored("mid", 60.0),
        ]);

        assert_eq!(ids(&set), ["high", "mid", "low", "broken-a", "broken-b"]);
        assert_eq!(set.scored_count(), 3);
        assert_eq!(set.failed_count(), 2);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let set = ResultSet::rank(vec![
            scored("first", 70.0),
            scored("second", 80.0),
            scored("third", 70.0),
            scored("fourth", 70.0),
        ]);

        assert_eq!(ids(&set), ["second", "first", "third", "fourth"]);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(75.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(74.9), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(50.0), ScoreBand::Moderate);
        assert_eq!(ScoreBand::from_score(49.9), ScoreBand::Weak);
        assert_eq!(ScoreBand::from_score(-12.0), ScoreBand::Weak);
        assert_eq!(failed("x").band(), None);
    }

    #[test]
    fn test_failure_kind_from_error() {
        let timeout = CandidateError::from(&ResumeRankerError::Timeout(std::time::Duration::from_secs(3)));
        assert_eq!(timeout.kind, FailureKind::Timeout);

        let mismatch = CandidateError::from(&ResumeRankerError::DimensionMismatch { expected: 256, actual: 512 });
        assert_eq!(mismatch.kind, FailureKind::DimensionMismatch);
        assert!(mismatch.message.contains("256"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(CandidateId::from("/tmp/resumes/jane.pdf").display_name(), "jane.pdf");
        assert_eq!(CandidateId::from("jane").display_name(), "jane");
    }

    #[test]
    fn test_records_serialization() {
        let set = ResultSet::rank(vec![
            failed("bad.pdf"),
            MatchResult::Scored {
                id: CandidateId::from("good.pdf"),
                similarity: 0.812,
                score: 81.2,
                missing_keywords: KeywordGaps::Missing(vec!["docker".to_string()]),
            },
        ]);

        let json = serde_json::to_value(set.to_records()).unwrap();
        assert_eq!(json[0]["id"], "good.pdf");
        assert_eq!(json[0]["status"], "scored");
        assert_eq!(json[0]["score"], 81.2);
        assert_eq!(json[0]["missingKeywords"][0], "docker");
        assert!(json[0].get("error").is_none());

        assert_eq!(json[1]["status"], "error");
        assert!(json[1]["error"].as_str().unwrap().contains("unreadable"));
        assert!(json[1].get("score").is_none());
    }
}

//! Report envelope around a ranked result set

use crate::processing::results::{CandidateId, RecordStatus, ResultRecord, ResultSet, ScoreBand};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest reference excerpt carried in report metadata
const REFERENCE_PREVIEW_CHARS: usize = 160;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    pub metadata: ReportMetadata,
    /// Ranking order, one record per candidate
    pub results: Vec<ResultRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub ranker_version: String,
    pub embedding_model: String,
    pub processing_time_ms: u64,
    pub reference_preview: String,
    pub candidate_count: usize,
    pub scored_count: usize,
    pub failed_count: usize,
}

/// Display-ready view of one record
#[derive(Debug, Clone)]
pub struct ReportRow {
    /// 1-based position among scored entries
    pub rank: Option<usize>,
    pub name: String,
    pub score: Option<f64>,
    pub band: Option<ScoreBand>,
    pub detail: String,
}

impl RankingReport {
    pub fn new(
        results: &ResultSet,
        reference_text: &str,
        embedding_model: &str,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                ranker_version: env!("CARGO_PKG_VERSION").to_string(),
                embedding_model: embedding_model.to_string(),
                processing_time_ms,
                reference_preview: preview(reference_text, REFERENCE_PREVIEW_CHARS),
                candidate_count: results.len(),
                scored_count: results.scored_count(),
                failed_count: results.failed_count(),
            },
            results: results.to_records(),
        }
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        let mut next_rank = 0;

        self.results
            .iter()
            .map(|record| {
                let name = CandidateId::new(record.id.as_str()).display_name().to_string();
                match record.status {
                    RecordStatus::Scored => {
                        next_rank += 1;
                        let detail = match record.missing_keywords.as_deref() {
                            Some(keywords) if !keywords.is_empty() => keywords.join(", "),
                            _ => "None".to_string(),
                        };
                        ReportRow {
                            rank: Some(next_rank),
                            name,
                            score: record.score,
                            band: record.score.map(ScoreBand::from_score),
                            detail,
                        }
                    }
                    RecordStatus::Error => ReportRow {
                        rank: None,
                        name,
                        score: None,
                        band: None,
                        detail: record.error.clone().unwrap_or_default(),
                    },
                }
            })
            .collect()
    }
}

/// Whitespace-collapsed prefix of `text`, cut at a char boundary
fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = crate::processing::text_normalizer::collapse_whitespace(text);
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let cut: String = collapsed.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResumeRankerError;
    use crate::processing::keyword_gaps::KeywordGaps;
    use crate::processing::results::MatchResult;

    fn sample_results() -> ResultSet {
        ResultSet::rank(vec![
            MatchResult::failed(
                CandidateId::from("/cv/scan.pdf"),
                &ResumeRankerError::Extraction("no text".to_string()),
            ),
            MatchResult::Scored {
                id: CandidateId::from("/cv/alice.pdf"),
                similarity: 0.81,
                score: 81.0,
                missing_keywords: KeywordGaps::NoneMissing,
            },
            MatchResult::Scored {
                id: CandidateId::from("/cv/bob.txt"),
                similarity: 0.55,
                score: 55.0,
                missing_keywords: KeywordGaps::Missing(vec!["docker".to_string(), "senior".to_string()]),
            },
        ])
    }

    #[test]
    fn test_report_metadata() {
        let report = RankingReport::new(&sample_results(), "Senior   Rust\ndeveloper", "test-model", 42);

        assert_eq!(report.metadata.candidate_count, 3);
        assert_eq!(report.metadata.scored_count, 2);
        assert_eq!(report.metadata.failed_count, 1);
        assert_eq!(report.metadata.reference_preview, "Senior Rust developer");
        assert_eq!(report.results[0].id, "/cv/alice.pdf");
    }

    #[test]
    fn test_rows() {
        let report = RankingReport::new(&sample_results(), "Rust", "test-model", 0);
        let rows = report.rows();

        assert_eq!(rows[0].rank, Some(1));
        assert_eq!(rows[0].name, "alice.pdf");
        assert_eq!(rows[0].band, Some(ScoreBand::Strong));
        assert_eq!(rows[0].detail, "None");

        assert_eq!(rows[1].rank, Some(2));
        assert_eq!(rows[1].band, Some(ScoreBand::Moderate));
        assert_eq!(rows[1].detail, "docker, senior");

        assert_eq!(rows[2].rank, None);
        assert_eq!(rows[2].name, "scan.pdf");
        assert!(rows[2].detail.contains("no text"));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "word ".repeat(100);
        let p = preview(&long, 20);
        assert!(p.ends_with("..."));
        assert!(p.chars().count() <= 23);
    }
}

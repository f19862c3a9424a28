//! Reference terms a candidate fails to mention

use crate::processing::text_normalizer::TokenSet;
use std::fmt;

/// At most this many missing keywords are reported per candidate
pub const MAX_MISSING_KEYWORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordGaps {
    /// Every reference token appears in the candidate
    NoneMissing,
    /// Lexicographically sorted, never empty, at most `MAX_MISSING_KEYWORDS`
    Missing(Vec<String>),
}

impl KeywordGaps {
    pub fn keywords(&self) -> &[String] {
        match self {
            KeywordGaps::NoneMissing => &[],
            KeywordGaps::Missing(keywords) => keywords,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, KeywordGaps::NoneMissing)
    }
}

impl fmt::Display for KeywordGaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordGaps::NoneMissing => write!(f, "None"),
            KeywordGaps::Missing(keywords) => write!(f, "{}", keywords.join(", ")),
        }
    }
}

/// Reference tokens absent from the candidate, sorted and capped
pub fn gaps(reference_tokens: &TokenSet, candidate_tokens: &TokenSet) -> KeywordGaps {
    let mut missing: Vec<&String> = reference_tokens.difference(candidate_tokens).collect();

    if missing.is_empty() {
        return KeywordGaps::NoneMissing;
    }

    missing.sort();
    KeywordGaps::Missing(
        missing
            .into_iter()
            .take(MAX_MISSING_KEYWORDS)
            .cloned()
            .collect(),
    )
}

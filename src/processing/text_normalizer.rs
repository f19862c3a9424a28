//! Whitespace normalization and token-set derivation

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Shortest token considered for keyword gap analysis
pub const MIN_TOKEN_CHARS: usize = 3;

/// Lowercase word tokens, deduplicated
pub type TokenSet = HashSet<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    pub text: String,
    pub tokens: TokenSet,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"))
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("Invalid token regex"))
}

/// Collapse whitespace runs to one space, trim, and derive the token set.
/// Total over every input; empty text yields an empty token set.
pub fn normalize(raw: &str) -> NormalizedText {
    let text = collapse_whitespace(raw);
    let tokens = tokenize(&text);
    NormalizedText { text, tokens }
}

pub fn collapse_whitespace(raw: &str) -> String {
    whitespace_regex().replace_all(raw, " ").trim().to_string()
}

/// Maximal runs of word characters, lowercased, at least `MIN_TOKEN_CHARS` long
pub fn tokenize(text: &str) -> TokenSet {
    let lowered = text.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        let normalized = normalize("  Senior\t\tRust \n\n developer\r\n ");
        assert_eq!(normalized.text, "Senior Rust developer");
    }

    #[test]
    fn test_empty_input() {
        let normalized = normalize("");
        assert!(normalized.is_empty());
        assert!(normalized.tokens.is_empty());

        let blank = normalize(" \n\t ");
        assert!(blank.is_empty());
        assert!(blank.tokens.is_empty());
    }

    #[test]
    fn test_tokens_lowercased_and_deduplicated() {
        let tokens = tokenize("Rust rust RUST Go, Kubernetes! k8s");
        assert!(tokens.contains("rust"));
        assert!(tokens.contains("kubernetes"));
        assert!(tokens.contains("k8s"));
        assert!(!tokens.contains("go"));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_tokens_split_on_punctuation() {
        let tokens = tokenize("node.js/typescript; C++ and snake_case");
        assert!(tokens.contains("node"));
        assert!(tokens.contains("typescript"));
        assert!(tokens.contains("and"));
        assert!(tokens.contains("snake_case"));
        assert!(!tokens.contains("js"));
    }

    #[test]
    fn test_short_runs_are_not_substrings_of_longer_words() {
        // "ab" inside "abcd" is never emitted on its own
        let tokens = tokenize("ab abcd");
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains("abcd"));
    }

    #[test]
    fn test_non_ascii_word_characters() {
        let tokens = tokenize("Café Résumé Zürich");
        assert!(tokens.contains("café"));
        assert!(tokens.contains("résumé"));
        assert!(tokens.contains("zürich"));
    }
}

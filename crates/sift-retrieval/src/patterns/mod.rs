//! Structural pattern recognition.
//!
//! [`PatternRegistry`] scores every catalog entry against a piece of code or
//! query text: each keyword hit adds [`KEYWORD_CONFIDENCE`], each regex hit
//! adds [`REGEX_CONFIDENCE`], capped at 1.0. Entries below
//! [`MIN_CONFIDENCE`] are not reported.

pub mod catalog;

use sift_core::models::{CodeContext, PatternMatch};
use sift_core::traits::IPatternRecognizer;

use catalog::{PatternDefinition, CATALOG};

pub const KEYWORD_CONFIDENCE: f64 = 0.3;
pub const REGEX_CONFIDENCE: f64 = 0.4;
pub const MIN_CONFIDENCE: f64 = 0.3;

/// Explicitly constructed pattern registry. Owned by whoever needs it; there
/// is no process-wide instance.
pub struct PatternRegistry {
    definitions: &'static [PatternDefinition],
    min_confidence: f64,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self {
            definitions: CATALOG,
            min_confidence: MIN_CONFIDENCE,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|d| d.name)
    }

    fn score(&self, definition: &PatternDefinition, text: &str, lowered: &str) -> Option<PatternMatch> {
        let matched_keywords: Vec<String> = definition
            .keywords
            .iter()
            .filter(|kw| contains_phrase(lowered, kw))
            .map(|kw| kw.to_string())
            .collect();
        let matched_patterns: Vec<String> = definition
            .regexes
            .iter()
            .filter_map(|re| re.as_ref())
            .filter(|re| re.is_match(text))
            .map(|re| re.as_str().to_string())
            .collect();

        let confidence = (matched_keywords.len() as f64 * KEYWORD_CONFIDENCE
            + matched_patterns.len() as f64 * REGEX_CONFIDENCE)
            .min(1.0);
        (confidence >= self.min_confidence && confidence > 0.0).then(|| PatternMatch {
            pattern_type: definition.pattern_type,
            pattern_name: definition.name.to_string(),
            confidence,
            matched_keywords,
            matched_patterns,
        })
    }
}

impl IPatternRecognizer for PatternRegistry {
    /// Matches sorted by confidence (descending), then name.
    fn recognize(&self, code: &str, _context: Option<&CodeContext>) -> Vec<PatternMatch> {
        if code.trim().is_empty() {
            return Vec::new();
        }
        let lowered = code.to_lowercase();
        let mut matches: Vec<PatternMatch> = self
            .definitions
            .iter()
            .filter_map(|d| self.score(d, code, &lowered))
            .collect();
        matches.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.pattern_name.cmp(&b.pattern_name))
        });
        matches
    }
}

/// Phrase match on word boundaries.
fn contains_phrase(lowered: &str, phrase: &str) -> bool {
    lowered.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before_ok = lowered[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = lowered[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(matches: &[PatternMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.pattern_name.as_str()).collect()
    }

    #[test]
    fn query_text_finds_retry_and_caching() {
        let found = PatternRegistry::new().recognize("implement caching with retry logic", None);
        let found = names(&found);
        assert!(found.contains(&"retry"));
        assert!(found.contains(&"caching"));
    }

    #[test]
    fn code_regexes_contribute() {
        let code = "class UserRepository:\n    def find_by_email(self, email):\n        pass";
        let found = PatternRegistry::new().recognize(code, None);
        assert_eq!(found[0].pattern_name, "repository");
        assert!(!found[0].matched_patterns.is_empty());
    }

    #[test]
    fn keywords_need_word_boundaries() {
        assert!(!contains_phrase("recache the value", "cache"));
        assert!(contains_phrase("use a cache here", "cache"));
    }

    #[test]
    fn empty_text_matches_nothing() {
        assert!(PatternRegistry::new().recognize("  ", None).is_empty());
    }

    #[test]
    fn results_sorted_by_confidence() {
        let found = PatternRegistry::new().recognize(
            "retry with exponential backoff behind a circuit breaker, half open after cooldown",
            None,
        );
        for pair in found.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }
}

//! Query enhancement: context injection, intent terms, vocabulary rewriting
//! and structural variants, deduplicated and capped.

pub mod intent_terms;
pub mod synonym_expander;
pub mod variants;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sift_core::config::RetrievalConfig;
use sift_core::models::{CodeContext, Query};
use sift_core::Intent;

const MAX_INJECTED_NAMES: usize = 3;
const MIN_SHARED_WORD_LEN: usize = 3;

/// Output of [`QueryEnhancer::enhance`]. `queries[0]` is always the original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedQuery {
    pub queries: Vec<String>,
    pub exclude_terms: Vec<String>,
}

impl EnhancedQuery {
    /// The unenhanced query: just the original text, nothing excluded.
    pub fn passthrough(text: &str) -> Self {
        Self {
            queries: vec![text.to_string()],
            exclude_terms: Vec::new(),
        }
    }
}

/// Produces ordered query variants and exclusion terms.
#[derive(Debug, Clone)]
pub struct QueryEnhancer {
    max_variants: usize,
}

impl Default for QueryEnhancer {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

impl QueryEnhancer {
    pub fn new(max_variants: usize) -> Self {
        Self {
            max_variants: max_variants.max(1),
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.max_query_variants)
    }

    pub fn enhance(&self, query: &Query, context: &CodeContext, intent: Intent) -> EnhancedQuery {
        let original = query.text.as_str();
        if original.trim().is_empty() {
            return EnhancedQuery::passthrough(original);
        }

        let mut candidates: Vec<String> = Vec::new();

        if let Some(injected) = context_variant(original, context) {
            candidates.push(injected);
        }

        let terms = intent_terms::terms_for(intent);
        let missing: Vec<&str> = terms
            .boost
            .iter()
            .copied()
            .filter(|t| !contains_word(original, t))
            .collect();
        if !missing.is_empty() {
            candidates.push(format!("{original} {}", missing.join(" ")));
        }

        let language = query.language.as_deref().or(context.language.as_deref());
        if let Some(rewritten) = language.and_then(|l| synonym_expander::apply_language(original, l)) {
            candidates.push(rewritten);
        }
        let framework = query.framework.as_deref().or(context.framework.as_deref());
        if let Some(rewritten) = framework.and_then(|f| synonym_expander::apply_framework(original, f)) {
            candidates.push(rewritten);
        }

        candidates.extend(synonym_expander::expand_abbreviations(original));
        candidates.extend(synonym_expander::swap_synonym(original));
        candidates.extend(variants::reorder(original));
        candidates.extend(variants::toggle_question(original));

        let exclude_terms = terms
            .exclude
            .iter()
            .filter(|t| !contains_word(original, t))
            .map(|t| t.to_string())
            .collect();

        EnhancedQuery {
            queries: dedupe_variants(original, candidates, self.max_variants),
            exclude_terms,
        }
    }
}

/// Append up to three context names (imports, functions, classes) that share a
/// word with the query.
fn context_variant(original: &str, context: &CodeContext) -> Option<String> {
    let query_words: HashSet<String> = identifier_words(original)
        .into_iter()
        .filter(|w| w.len() >= MIN_SHARED_WORD_LEN)
        .collect();
    if query_words.is_empty() {
        return None;
    }

    let mut injected: Vec<&str> = Vec::new();
    let names = context
        .imports
        .iter()
        .chain(&context.functions)
        .chain(&context.classes);
    for name in names {
        if injected.len() == MAX_INJECTED_NAMES {
            break;
        }
        let shares_word = identifier_words(name)
            .iter()
            .any(|w| query_words.contains(w));
        if shares_word && !contains_word(original, name) && !injected.contains(&name.as_str()) {
            injected.push(name);
        }
    }

    (!injected.is_empty()).then(|| format!("{original} {}", injected.join(" ")))
}

/// Original first and untouched; the rest deduplicated case-insensitively with
/// whitespace collapsed, then capped.
fn dedupe_variants(original: &str, candidates: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(normalize(original));
    let mut queries = vec![original.to_string()];

    for candidate in candidates {
        if queries.len() >= cap {
            break;
        }
        let key = normalize(&candidate);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        queries.push(candidate.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    queries
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn contains_word(text: &str, word: &str) -> bool {
    let word = word.trim();
    if word.is_empty() {
        return false;
    }
    if word.contains(|c: char| !c.is_alphanumeric()) {
        return text.to_lowercase().contains(&word.to_lowercase());
    }
    text.split(|c: char| !c.is_alphanumeric())
        .any(|w| w.eq_ignore_ascii_case(word))
}

/// Split identifiers on punctuation and camelCase boundaries, lowercased.
pub(crate) fn identifier_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in text.split(|c: char| !c.is_alphanumeric()) {
        let mut current = String::new();
        let mut prev_lower = false;
        for c in chunk.chars() {
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current).to_lowercase());
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current.to_lowercase());
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enhancer() -> QueryEnhancer {
        QueryEnhancer::default()
    }

    #[test]
    fn original_query_is_first_and_unmodified() {
        let query = Query::new("  implement   caching with retry logic");
        let out = enhancer().enhance(&query, &CodeContext::default(), Intent::Implement);
        assert_eq!(out.queries[0], "  implement   caching with retry logic");
        assert!(out.queries.len() > 1);
    }

    #[test]
    fn variants_are_unique_case_insensitively() {
        let query = Query::new("Fix login bug");
        let out = enhancer().enhance(&query, &CodeContext::default(), Intent::Debug);
        let keys: HashSet<String> = out.queries.iter().map(|q| normalize(q)).collect();
        assert_eq!(keys.len(), out.queries.len());
    }

    #[test]
    fn cap_is_respected() {
        let query = Query::new("auth db config handler with cache");
        let out = QueryEnhancer::new(3).enhance(&query, &CodeContext::default(), Intent::Implement);
        assert_eq!(out.queries.len(), 3);
    }

    #[test]
    fn context_names_sharing_a_word_are_injected() {
        let context = CodeContext {
            imports: vec!["redis_cache".into(), "os".into()],
            functions: vec!["retryWithBackoff".into()],
            ..Default::default()
        };
        let query = Query::new("add cache retry");
        let out = enhancer().enhance(&query, &context, Intent::Implement);
        assert!(out
            .queries
            .iter()
            .any(|q| q == "add cache retry redis_cache retryWithBackoff"));
    }

    #[test]
    fn intent_exclusions_skip_terms_the_query_mentions() {
        let query = Query::new("implement a mock server");
        let out = enhancer().enhance(&query, &CodeContext::default(), Intent::Implement);
        assert_eq!(out.exclude_terms, vec!["test".to_string()]);
    }

    #[test]
    fn empty_query_passes_through() {
        let out = enhancer().enhance(&Query::new(""), &CodeContext::default(), Intent::Understand);
        assert_eq!(out, EnhancedQuery::passthrough(""));
    }

    #[test]
    fn identifier_words_split_camel_and_snake() {
        assert_eq!(
            identifier_words("retryWithBackoff redis_cache"),
            vec!["retry", "with", "backoff", "redis", "cache"]
        );
    }
}

//! The eight ranking factors.
//!
//! Each factor yields a [`ValidatedFactor`] carrying a value, a confidence and
//! the source that produced it. Missing inputs degrade to documented neutral
//! values at low confidence instead of failing.

use std::collections::HashSet;
use std::path::Path;

use sift_core::config::RankingConfig;
use sift_core::models::{CodeContext, FusedResult, PatternMatch, Query, RankingFactors, ValidatedFactor};
use sift_core::traits::IPatternRecognizer;

use crate::expansion::identifier_words;

const LOW_CONFIDENCE: f64 = 0.3;
const NEUTRAL: f64 = 0.5;
const FLAT_RANGE: f64 = 1e-12;

// Context overlap sub-weights.
const IMPORT_OVERLAP_WEIGHT: f64 = 0.3;
const USAGE_OVERLAP_WEIGHT: f64 = 0.3;
const FRAMEWORK_MATCH_WEIGHT: f64 = 0.2;
const LANGUAGE_MATCH_WEIGHT: f64 = 0.2;

// Proximity tiers.
const SAME_FILE: f64 = 1.0;
const SAME_DIRECTORY: f64 = 0.7;
const SAME_MODULE: f64 = 0.5;
const SAME_PROJECT: f64 = 0.3;
const SAME_LANGUAGE: f64 = 0.1;

// Quality signal confidences.
const EXPLICIT_QUALITY_CONFIDENCE: f64 = 0.8;
const COVERAGE_CONFIDENCE: f64 = 0.3;
const COMPLEXITY_CONFIDENCE: f64 = 0.3;
const DOCS_CONFIDENCE: f64 = 0.2;
const TEST_TAG_CONFIDENCE: f64 = 0.2;
const DEFAULT_QUALITY: f64 = 0.3;

/// Min/max of the batch-relative factors.
#[derive(Debug, Clone, Copy, Default)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.filter(|v| v.is_finite()).fold(None, |acc, v| {
            Some(match acc {
                None => Range { min: v, max: v },
                Some(r) => Range {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            })
        })
    }

    /// NaN for non-finite input, 0.5 for a flat batch.
    fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let span = self.max - self.min;
        if span <= FLAT_RANGE {
            NEUTRAL
        } else {
            (value - self.min) / span
        }
    }
}

/// Computes factors for one ranking batch. Batch statistics and query-side
/// inputs are derived once at construction.
pub struct FactorCalculator<'a> {
    config: &'a RankingConfig,
    recognizer: &'a dyn IPatternRecognizer,
    query: &'a Query,
    context: &'a CodeContext,
    query_tokens: HashSet<String>,
    query_patterns: HashSet<String>,
    text_range: Option<Range>,
    recency_range: Option<Range>,
}

impl<'a> FactorCalculator<'a> {
    pub fn new(
        config: &'a RankingConfig,
        recognizer: &'a dyn IPatternRecognizer,
        query: &'a Query,
        context: &'a CodeContext,
        batch: &[FusedResult],
    ) -> Self {
        let query_patterns = recognizer
            .recognize(&query.text, Some(context))
            .into_iter()
            .map(|m| m.pattern_name)
            .collect();
        Self {
            config,
            recognizer,
            query,
            context,
            query_tokens: token_set(&query.text),
            query_patterns,
            text_range: Range::of(batch.iter().map(|r| text_signal(r).0)),
            recency_range: Range::of(
                batch
                    .iter()
                    .filter_map(|r| r.last_modified)
                    .map(|t| t.timestamp_millis() as f64),
            ),
        }
    }

    pub fn compute(&self, result: &FusedResult) -> RankingFactors {
        RankingFactors {
            text_relevance: self.text_relevance(result),
            semantic_similarity: self.semantic_similarity(result),
            context_overlap: self.context_overlap(result),
            import_similarity: self.import_similarity(result),
            proximity_score: self.proximity(result),
            recency_score: self.recency(result),
            quality_score: self.quality(result),
            pattern_match: self.pattern_match(result),
        }
    }

    fn text_relevance(&self, result: &FusedResult) -> ValidatedFactor {
        let (raw, confidence, source) = text_signal(result);
        let value = self
            .text_range
            .map_or(NEUTRAL, |range| range.normalize(raw));
        ValidatedFactor::new(value, confidence, source)
    }

    fn semantic_similarity(&self, result: &FusedResult) -> ValidatedFactor {
        if let Some(score) = result.cross_encoder_score.filter(|s| s.is_finite()) {
            let value = if (0.0..=1.0).contains(&score) {
                score
            } else {
                sigmoid(score)
            };
            return ValidatedFactor::new(value, 1.0, "cross_encoder");
        }
        if let Some(score) = result.semantic_score.filter(|s| s.is_finite()) {
            let value = if score > 1.0 { score / 4.0 } else { score };
            return ValidatedFactor::new(value, 0.9, "semantic");
        }
        if let Some(score) = result.reranker_score.filter(|s| s.is_finite()) {
            return ValidatedFactor::new(score / 4.0, 0.9, "reranker");
        }
        if let Some(score) = result.vector_score.filter(|s| s.is_finite()) {
            let value = if score < 0.0 { (score + 1.0) / 2.0 } else { score };
            return ValidatedFactor::new(value, 0.8, "vector");
        }
        let snippet_tokens = token_set(&result.code_snippet);
        if !self.query_tokens.is_empty() && !snippet_tokens.is_empty() {
            return ValidatedFactor::new(
                jaccard(&self.query_tokens, &snippet_tokens),
                0.6,
                "keyword_overlap",
            );
        }
        ValidatedFactor::new(0.0, LOW_CONFIDENCE, "unavailable")
    }

    fn context_overlap(&self, result: &FusedResult) -> ValidatedFactor {
        let mut weighted = 0.0;
        let mut used = 0.0;
        let snippet = result.code_snippet.to_lowercase();

        if !self.context.imports.is_empty() {
            let result_imports: HashSet<String> =
                result.imports.iter().map(|i| i.to_lowercase()).collect();
            let matched = self
                .context
                .imports
                .iter()
                .map(|i| i.to_lowercase())
                .filter(|i| result_imports.contains(i) || snippet.contains(i.as_str()))
                .count();
            weighted += IMPORT_OVERLAP_WEIGHT * matched as f64 / self.context.imports.len() as f64;
            used += IMPORT_OVERLAP_WEIGHT;
        }

        let names: Vec<String> = self
            .context
            .functions
            .iter()
            .chain(&self.context.classes)
            .map(|n| n.to_lowercase())
            .collect();
        if !names.is_empty() {
            let matched = names.iter().filter(|n| snippet.contains(n.as_str())).count();
            weighted += USAGE_OVERLAP_WEIGHT * matched as f64 / names.len() as f64;
            used += USAGE_OVERLAP_WEIGHT;
        }

        let framework = self
            .query
            .framework
            .as_deref()
            .or(self.context.framework.as_deref());
        if let Some(framework) = framework {
            let framework = framework.to_lowercase();
            let mentions = snippet.contains(&framework)
                || result
                    .imports
                    .iter()
                    .any(|i| i.to_lowercase().contains(&framework));
            weighted += FRAMEWORK_MATCH_WEIGHT * f64::from(u8::from(mentions));
            used += FRAMEWORK_MATCH_WEIGHT;
        }

        if let (Some(wanted), Some(actual)) = (self.context_language(), result.language.as_deref()) {
            let matches = wanted.eq_ignore_ascii_case(actual);
            weighted += LANGUAGE_MATCH_WEIGHT * f64::from(u8::from(matches));
            used += LANGUAGE_MATCH_WEIGHT;
        }

        if used <= 0.0 {
            return ValidatedFactor::new(0.0, LOW_CONFIDENCE, "no_context");
        }
        ValidatedFactor::new(weighted / used, used.max(LOW_CONFIDENCE), "context")
    }

    fn import_similarity(&self, result: &FusedResult) -> ValidatedFactor {
        if self.context.imports.is_empty() || result.imports.is_empty() {
            return ValidatedFactor::new(0.0, LOW_CONFIDENCE, "no_imports");
        }
        let ours: HashSet<String> = self.context.imports.iter().map(|i| i.to_lowercase()).collect();
        let theirs: HashSet<String> = result.imports.iter().map(|i| i.to_lowercase()).collect();
        ValidatedFactor::new(jaccard(&ours, &theirs), 1.0, "imports")
    }

    fn proximity(&self, result: &FusedResult) -> ValidatedFactor {
        let current = self
            .query
            .current_file
            .as_deref()
            .or(self.context.current_file.as_deref());
        let repository = self
            .query
            .repository
            .as_deref()
            .or(self.context.repository.as_deref());
        let language = self.context_language();

        if current.is_none()
            && repository.is_none()
            && self.context.project_root.is_none()
            && language.is_none()
        {
            return ValidatedFactor::new(0.0, LOW_CONFIDENCE, "no_location");
        }

        let base = base_proximity(
            current,
            result.file_path.as_deref(),
            repository,
            result.repository.as_deref(),
            self.context.project_root.as_deref(),
            language,
            result.language.as_deref(),
        );
        let value = if self.config.proximity_damping {
            damp_proximity(base)
        } else {
            base
        };
        let confidence = if current.is_some() { 1.0 } else { 0.6 };
        ValidatedFactor::new(value, confidence, "proximity")
    }

    fn recency(&self, result: &FusedResult) -> ValidatedFactor {
        match (result.last_modified, self.recency_range) {
            (Some(modified), Some(range)) => {
                if range.max - range.min <= FLAT_RANGE {
                    ValidatedFactor::new(NEUTRAL, NEUTRAL, "recency_flat")
                } else {
                    let value = range.normalize(modified.timestamp_millis() as f64);
                    ValidatedFactor::new(value, 0.8, "last_modified")
                }
            }
            _ => ValidatedFactor::new(NEUTRAL, LOW_CONFIDENCE, "no_timestamp"),
        }
    }

    fn quality(&self, result: &FusedResult) -> ValidatedFactor {
        if let Some(quality) = result.quality.filter(|q| q.is_finite()) {
            return ValidatedFactor::new(quality, EXPLICIT_QUALITY_CONFIDENCE, "quality");
        }

        let mut signals: Vec<(f64, f64)> = Vec::new();
        if let Some(coverage) = result.test_coverage.filter(|c| c.is_finite()) {
            let coverage = if coverage > 1.0 { coverage / 100.0 } else { coverage };
            signals.push((coverage, COVERAGE_CONFIDENCE));
        }
        if let Some(complexity) = result.complexity.filter(|c| c.is_finite()) {
            let inverse = 1.0 - (complexity.max(0.0) / self.config.complexity_ceiling).min(1.0);
            signals.push((inverse, COMPLEXITY_CONFIDENCE));
        }
        if result
            .documentation
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
        {
            signals.push((1.0, DOCS_CONFIDENCE));
        }
        if result.tags.iter().any(|t| t.eq_ignore_ascii_case("test")) {
            signals.push((1.0, TEST_TAG_CONFIDENCE));
        }

        if signals.is_empty() {
            return ValidatedFactor::new(DEFAULT_QUALITY, LOW_CONFIDENCE, "default");
        }
        let confidence: f64 = signals.iter().map(|(_, c)| c).sum();
        let value = signals.iter().map(|(v, c)| v * c).sum::<f64>() / confidence;
        ValidatedFactor::new(value, confidence.min(1.0), "quality_signals")
    }

    fn pattern_match(&self, result: &FusedResult) -> ValidatedFactor {
        let found = self
            .recognizer
            .recognize(&result.code_snippet, Some(self.context));
        pattern_factor(&found, &self.query_patterns)
    }

    fn context_language(&self) -> Option<&str> {
        self.query
            .language
            .as_deref()
            .or(self.context.language.as_deref())
    }
}

/// Raw text signal: BM25, then the original score, then the current score.
fn text_signal(result: &FusedResult) -> (f64, f64, &'static str) {
    if let Some(bm25) = result.bm25_score {
        (bm25, 1.0, "bm25")
    } else if result.original_score.is_finite() {
        (result.original_score, 0.8, "original_score")
    } else {
        (result.score, 0.6, "score")
    }
}

fn pattern_factor(found: &[PatternMatch], query_patterns: &HashSet<String>) -> ValidatedFactor {
    if found.is_empty() {
        return ValidatedFactor::new(0.0, NEUTRAL, "no_patterns");
    }
    let overlapping = found
        .iter()
        .filter(|m| query_patterns.contains(&m.pattern_name))
        .map(|m| m.confidence)
        .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |a| a.max(c))));
    if let Some(best) = overlapping {
        return ValidatedFactor::new(best, 1.0, "pattern_overlap");
    }
    let best = found.iter().map(|m| m.confidence).fold(0.0, f64::max);
    ValidatedFactor::new(0.5 * best, 0.6, "patterns")
}

pub(crate) fn base_proximity(
    current_file: Option<&str>,
    result_file: Option<&str>,
    repository: Option<&str>,
    result_repository: Option<&str>,
    project_root: Option<&str>,
    language: Option<&str>,
    result_language: Option<&str>,
) -> f64 {
    if let (Some(current), Some(file)) = (current_file, result_file) {
        let current = Path::new(current);
        let file = Path::new(file);
        if current == file {
            return SAME_FILE;
        }
        let current_dir = current.parent();
        let file_dir = file.parent();
        if current_dir.is_some() && current_dir == file_dir {
            return SAME_DIRECTORY;
        }
        let current_module = current_dir.and_then(Path::parent);
        let file_module = file_dir.and_then(Path::parent);
        if current_module.is_some_and(|m| !m.as_os_str().is_empty() && m != Path::new("/"))
            && current_module == file_module
        {
            return SAME_MODULE;
        }
    }
    let same_repository = matches!((repository, result_repository), (Some(a), Some(b)) if a == b);
    let under_root = matches!((project_root, result_file), (Some(root), Some(file)) if Path::new(file).starts_with(root));
    if same_repository || under_root {
        return SAME_PROJECT;
    }
    if matches!((language, result_language), (Some(a), Some(b)) if a.eq_ignore_ascii_case(b)) {
        return SAME_LANGUAGE;
    }
    0.0
}

/// `min(ln(1 + 4b) / ln 5, 1)`: compresses locality so it cannot dominate.
pub(crate) fn damp_proximity(base: f64) -> f64 {
    ((1.0 + base * 4.0).ln() / 5.0_f64.ln()).min(1.0)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn token_set(text: &str) -> HashSet<String> {
    identifier_words(text)
        .into_iter()
        .filter(|w| w.len() > 1)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

//! Ranking factors and the validated value/confidence pair each one carries.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Neutral value substituted for NaN/Inf inputs.
pub const NEUTRAL_FACTOR_VALUE: f64 = 0.5;

/// The eight ranking signals, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    TextRelevance,
    SemanticSimilarity,
    ContextOverlap,
    ImportSimilarity,
    ProximityScore,
    RecencyScore,
    QualityScore,
    PatternMatch,
}

impl Factor {
    pub const COUNT: usize = 8;

    pub const ALL: [Factor; 8] = [
        Self::TextRelevance,
        Self::SemanticSimilarity,
        Self::ContextOverlap,
        Self::ImportSimilarity,
        Self::ProximityScore,
        Self::RecencyScore,
        Self::QualityScore,
        Self::PatternMatch,
    ];

    /// Position in [`Factor::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case key used in weight tables and config.
    pub fn key(self) -> &'static str {
        match self {
            Self::TextRelevance => "text_relevance",
            Self::SemanticSimilarity => "semantic_similarity",
            Self::ContextOverlap => "context_overlap",
            Self::ImportSimilarity => "import_similarity",
            Self::ProximityScore => "proximity_score",
            Self::RecencyScore => "recency_score",
            Self::QualityScore => "quality_score",
            Self::PatternMatch => "pattern_match",
        }
    }

    /// Human-readable label used in explanations.
    pub fn label(self) -> &'static str {
        match self {
            Self::TextRelevance => "Text relevance",
            Self::SemanticSimilarity => "Semantic similarity",
            Self::ContextOverlap => "Context overlap",
            Self::ImportSimilarity => "Import similarity",
            Self::ProximityScore => "Proximity",
            Self::RecencyScore => "Recency",
            Self::QualityScore => "Quality",
            Self::PatternMatch => "Pattern match",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A factor value paired with a confidence and its provenance.
///
/// Both numbers are clamped to [0.0, 1.0] at construction; NaN/Inf inputs are
/// replaced with [`NEUTRAL_FACTOR_VALUE`] and logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedFactor {
    value: f64,
    confidence: f64,
    source: String,
}

impl ValidatedFactor {
    pub fn new(value: f64, confidence: f64, source: impl Into<String>) -> Self {
        let source = source.into();
        let value = sanitize(value, "value", &source);
        let confidence = sanitize(confidence, "confidence", &source);
        Self {
            value,
            confidence,
            source,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn sanitize(raw: f64, field: &'static str, source: &str) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        warn!(field, source, raw = %raw, "non-finite ranking factor replaced with neutral value");
        NEUTRAL_FACTOR_VALUE
    }
}

/// All eight factors for one candidate in one ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingFactors {
    pub text_relevance: ValidatedFactor,
    pub semantic_similarity: ValidatedFactor,
    pub context_overlap: ValidatedFactor,
    pub import_similarity: ValidatedFactor,
    pub proximity_score: ValidatedFactor,
    pub recency_score: ValidatedFactor,
    pub quality_score: ValidatedFactor,
    pub pattern_match: ValidatedFactor,
}

impl RankingFactors {
    pub fn get(&self, factor: Factor) -> &ValidatedFactor {
        match factor {
            Factor::TextRelevance => &self.text_relevance,
            Factor::SemanticSimilarity => &self.semantic_similarity,
            Factor::ContextOverlap => &self.context_overlap,
            Factor::ImportSimilarity => &self.import_similarity,
            Factor::ProximityScore => &self.proximity_score,
            Factor::RecencyScore => &self.recency_score,
            Factor::QualityScore => &self.quality_score,
            Factor::PatternMatch => &self.pattern_match,
        }
    }

    /// Factors paired with their identity, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, &ValidatedFactor)> {
        Factor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Snapshot of the raw values.
    pub fn values(&self) -> FactorValues {
        let mut values = [0.0; Factor::COUNT];
        for (factor, validated) in self.iter() {
            values[factor.index()] = validated.value();
        }
        FactorValues(values)
    }
}

/// Plain factor values for one ranked result, kept on the result so feedback can
/// be attributed to factors later.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorValues(pub [f64; Factor::COUNT]);

impl FactorValues {
    pub fn get(&self, factor: Factor) -> f64 {
        self.0[factor.index()]
    }
}

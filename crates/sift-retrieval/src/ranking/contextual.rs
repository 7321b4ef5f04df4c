//! Eight-factor contextual ranker.

use std::sync::Arc;

use sift_core::config::RankingConfig;
use sift_core::errors::RankingError;
use sift_core::models::{CodeContext, FusedResult, Query};
use sift_core::traits::IPatternRecognizer;
use sift_core::Intent;
use tracing::debug;

use super::explanation::explain;
use super::factors::FactorCalculator;
use super::scorer::{dominant_factor, weighted_score};
use super::tiebreak::sort_results;
use super::weights::{IntentWeights, WeightTable};
use super::Ranker;

/// Re-scores fused results from eight validated factors and reorders them
/// deterministically.
pub struct ContextualRanker {
    config: RankingConfig,
    weights: WeightTable,
    patterns: Arc<dyn IPatternRecognizer>,
}

impl ContextualRanker {
    pub fn new(config: RankingConfig, patterns: Arc<dyn IPatternRecognizer>) -> Self {
        Self {
            config,
            weights: WeightTable::default(),
            patterns,
        }
    }

    /// Replace the weight table. Every row must be complete and normalized.
    pub fn with_weights(mut self, weights: WeightTable) -> Result<Self, RankingError> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    pub fn weight_table(&self) -> &WeightTable {
        &self.weights
    }

    /// Rank with explicitly supplied weights. Never touches the ranker's own
    /// table, so concurrent calls with different weights are independent.
    pub fn rank_with_weights(
        &self,
        query: &Query,
        mut results: Vec<FusedResult>,
        context: &CodeContext,
        intent: Intent,
        weights: &IntentWeights,
    ) -> Result<Vec<FusedResult>, RankingError> {
        weights.validate(intent)?;
        if results.is_empty() {
            return Ok(results);
        }

        let calculator = FactorCalculator::new(
            &self.config,
            self.patterns.as_ref(),
            query,
            context,
            &results,
        );
        let scored: Vec<_> = results.iter().map(|r| calculator.compute(r)).collect();
        for (result, factors) in results.iter_mut().zip(scored) {
            result.score = weighted_score(&factors, weights);
            result.explanation = Some(explain(&factors, weights));
            result.factor_values = Some(factors.values());
            result.dominant_factor = dominant_factor(&factors, weights);
        }
        sort_results(&mut results);
        debug!(intent = %intent, results = results.len(), "ranked");
        Ok(results)
    }
}

impl Ranker for ContextualRanker {
    fn rank(
        &self,
        query: &Query,
        results: Vec<FusedResult>,
        context: &CodeContext,
        intent: Intent,
    ) -> Result<Vec<FusedResult>, RankingError> {
        let weights = self.weights.get(intent);
        self.rank_with_weights(query, results, context, intent, &weights)
    }

    fn weights_for(&self, intent: Intent) -> IntentWeights {
        self.weights.get(intent)
    }
}

#[cfg(test)]
mod tests {
    use sift_core::models::Factor;

    use super::*;
    use crate::patterns::PatternRegistry;

    fn ranker() -> ContextualRanker {
        ContextualRanker::new(RankingConfig::default(), Arc::new(PatternRegistry::new()))
    }

    fn result(id: &str, bm25: f64, snippet: &str) -> FusedResult {
        FusedResult {
            id: id.into(),
            score: 0.1,
            fused_score: 0.1,
            original_score: bm25,
            bm25_score: Some(bm25),
            code_snippet: snippet.into(),
            file_path: Some(format!("/src/{id}.py")),
            ..Default::default()
        }
    }

    #[test]
    fn higher_bm25_ranks_first_and_scores_are_bounded() {
        let ranked = ranker()
            .rank(
                &Query::new("load settings"),
                vec![result("low", 1.0, "x = 1"), result("high", 9.0, "y = 2")],
                &CodeContext::default(),
                Intent::Debug,
            )
            .unwrap();
        assert_eq!(ranked[0].id, "high");
        for r in &ranked {
            assert!((0.0..=1.0).contains(&r.score));
            assert!(r.explanation.is_some());
            assert!(r.factor_values.is_some());
        }
    }

    #[test]
    fn invalid_override_is_an_error() {
        let mut weights = WeightTable::default().get(Intent::Test);
        weights.0[Factor::PatternMatch.index()] = 0.9;
        let err = ranker().rank_with_weights(
            &Query::new("q"),
            vec![result("a", 1.0, "a")],
            &CodeContext::default(),
            Intent::Test,
            &weights,
        );
        assert!(err.is_err());
    }

    #[test]
    fn explicit_weights_do_not_change_the_table() {
        let ranker = ranker();
        let before = ranker.weight_table().clone();
        let custom = IntentWeights([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        ranker
            .rank_with_weights(
                &Query::new("q"),
                vec![result("a", 1.0, "a")],
                &CodeContext::default(),
                Intent::Implement,
                &custom,
            )
            .unwrap();
        assert_eq!(ranker.weight_table(), &before);
    }
}

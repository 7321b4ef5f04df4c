//! Contextual re-ranking.
//!
//! ```text
//! FusedResult batch
//!   → FactorCalculator (8 ValidatedFactors per result, batch-relative where noted)
//!   → weighted_score   Σ v·w·c / Σ w·c
//!   → explain          top-3 contributions
//!   → sort_results     score, original score, snippet length, path
//! ```

pub mod contextual;
pub mod explanation;
pub mod factors;
pub mod scorer;
pub mod tiebreak;
pub mod weights;

use sift_core::errors::RankingError;
use sift_core::models::{CodeContext, FusedResult, InteractionRecord, Query};
use sift_core::Intent;

pub use contextual::ContextualRanker;
pub use scorer::{dominant_factor, weighted_score};
pub use weights::{IntentWeights, WeightTable};

/// A ranking strategy over fused results.
pub trait Ranker: Send + Sync {
    fn rank(
        &self,
        query: &Query,
        results: Vec<FusedResult>,
        context: &CodeContext,
        intent: Intent,
    ) -> Result<Vec<FusedResult>, RankingError>;

    /// Weights currently applied for `intent`.
    fn weights_for(&self, intent: Intent) -> IntentWeights;

    /// Accept an interaction for learning. Returns false when the ranker does
    /// not learn or the record was dropped.
    fn record_feedback(&self, _record: InteractionRecord) -> bool {
        false
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Weighted RRF fusion, budget pruning and context assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// RRF smoothing constant.
    pub rrf_k: f64,
    /// Weight per stage *position* in the intent's stage list.
    pub stage_weights: Vec<f64>,
    /// Share of the hybrid score taken from the RRF term.
    pub rrf_blend: f64,
    /// Share of the hybrid score taken from the normalized stage score.
    pub score_blend: f64,
    /// Number of fused candidates kept.
    pub top_k: usize,
    /// Token budget used to prune stage lists before fusion.
    pub pruning_budget: usize,
    /// Approximate token cost of one document during pruning.
    pub tokens_per_document: usize,
    /// Token budget for the assembled context window.
    pub context_budget: usize,
    /// Tokens held back from the context budget.
    pub context_safety_margin: usize,
}

impl FusionConfig {
    /// Weight for a stage at `position`; positions past the table reuse the last weight.
    pub fn stage_weight(&self, position: usize) -> f64 {
        self.stage_weights
            .get(position)
            .or_else(|| self.stage_weights.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Context budget after the safety margin is held back.
    pub fn effective_context_budget(&self) -> usize {
        self.context_budget.saturating_sub(self.context_safety_margin)
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            stage_weights: defaults::DEFAULT_STAGE_WEIGHTS.to_vec(),
            rrf_blend: defaults::DEFAULT_RRF_BLEND,
            score_blend: defaults::DEFAULT_SCORE_BLEND,
            top_k: defaults::DEFAULT_FUSION_TOP_K,
            pruning_budget: defaults::DEFAULT_PRUNING_BUDGET,
            tokens_per_document: defaults::DEFAULT_TOKENS_PER_DOCUMENT,
            context_budget: defaults::DEFAULT_CONTEXT_BUDGET,
            context_safety_margin: defaults::DEFAULT_CONTEXT_SAFETY_MARGIN,
        }
    }
}

//! Per-intent factor weights.
//!
//! Every intent carries a weight for all eight factors; each row is
//! non-negative and sums to 1.0.

use serde::{Deserialize, Serialize};
use sift_core::errors::RankingError;
use sift_core::models::Factor;
use sift_core::Intent;

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// One intent's weights, indexed by [`Factor::index`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentWeights(pub [f64; Factor::COUNT]);

impl IntentWeights {
    pub fn get(&self, factor: Factor) -> f64 {
        self.0[factor.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Clamp negatives to zero and rescale to sum to 1.0. An all-zero row
    /// becomes uniform.
    pub fn normalized(&self) -> Self {
        let mut weights = self.0.map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 });
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Self([1.0 / Factor::COUNT as f64; Factor::COUNT]);
        }
        for w in &mut weights {
            *w /= sum;
        }
        Self(weights)
    }

    pub fn validate(&self, intent: Intent) -> Result<(), RankingError> {
        if let Some(factor) = Factor::ALL
            .iter()
            .find(|f| !(self.get(**f).is_finite() && self.get(**f) >= 0.0))
        {
            return Err(RankingError::InvalidWeights {
                intent,
                reason: format!("{factor} must be finite and non-negative"),
            });
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RankingError::InvalidWeights {
                intent,
                reason: format!("weights sum to {sum:.4}, expected 1.0"),
            });
        }
        Ok(())
    }
}

/// Weights for every intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    rows: [IntentWeights; Intent::COUNT],
}

// Column order: text, semantic, context, imports, proximity, recency, quality, pattern.
const DEFAULT_ROWS: [[f64; Factor::COUNT]; Intent::COUNT] = [
    [0.20, 0.20, 0.15, 0.10, 0.10, 0.05, 0.10, 0.10], // implement
    [0.25, 0.15, 0.15, 0.10, 0.15, 0.10, 0.05, 0.05], // debug
    [0.15, 0.30, 0.15, 0.05, 0.05, 0.05, 0.15, 0.10], // understand
    [0.10, 0.15, 0.15, 0.10, 0.10, 0.05, 0.15, 0.20], // refactor
    [0.20, 0.15, 0.15, 0.15, 0.10, 0.05, 0.15, 0.05], // test
    [0.15, 0.25, 0.10, 0.05, 0.05, 0.10, 0.25, 0.05], // document
];

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS.map(IntentWeights),
        }
    }
}

impl WeightTable {
    pub fn get(&self, intent: Intent) -> IntentWeights {
        self.rows[intent.index()]
    }

    pub fn set(&mut self, intent: Intent, weights: IntentWeights) {
        self.rows[intent.index()] = weights;
    }

    pub fn validate(&self) -> Result<(), RankingError> {
        Intent::ALL
            .iter()
            .try_for_each(|intent| self.get(*intent).validate(*intent))
    }
}

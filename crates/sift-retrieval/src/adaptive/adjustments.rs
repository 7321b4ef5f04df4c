//! Bounded weight adjustments.
//!
//! Signals are smoothed with an exponential moving average. Each update moves
//! a factor's offset by at most `max_step`, and the total offset from the base
//! weight never exceeds `max_adjustment`. Adjusted rows are clamped at zero
//! and renormalized to sum to 1.0.

use serde::{Deserialize, Serialize};
use sift_core::config::AdaptiveConfig;
use sift_core::models::Factor;
use sift_core::Intent;

use crate::ranking::{IntentWeights, WeightTable};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentBounds {
    pub learning_rate: f64,
    pub max_step: f64,
    pub max_adjustment: f64,
}

impl AdjustmentBounds {
    pub fn from_config(config: &AdaptiveConfig) -> Self {
        Self {
            learning_rate: config.learning_rate,
            max_step: config.max_step,
            max_adjustment: config.max_adjustment,
        }
    }
}

/// Per-intent smoothed signals and accumulated offsets from the base table.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentState {
    base: WeightTable,
    bounds: AdjustmentBounds,
    ema: [[f64; Factor::COUNT]; Intent::COUNT],
    offsets: [[f64; Factor::COUNT]; Intent::COUNT],
}

impl AdjustmentState {
    pub fn new(base: WeightTable, bounds: AdjustmentBounds) -> Self {
        Self {
            base,
            bounds,
            ema: [[0.0; Factor::COUNT]; Intent::COUNT],
            offsets: [[0.0; Factor::COUNT]; Intent::COUNT],
        }
    }

    pub fn offset(&self, intent: Intent, factor: Factor) -> f64 {
        self.offsets[intent.index()][factor.index()]
    }

    /// Fold one signal into `intent`'s offsets.
    pub fn apply(&mut self, intent: Intent, signal: &[f64; Factor::COUNT]) {
        let lr = self.bounds.learning_rate;
        let ema = &mut self.ema[intent.index()];
        let offsets = &mut self.offsets[intent.index()];
        for factor in Factor::ALL {
            let i = factor.index();
            if !signal[i].is_finite() {
                continue;
            }
            ema[i] = (1.0 - lr) * ema[i] + lr * signal[i];
            let step = ema[i].clamp(-self.bounds.max_step, self.bounds.max_step);
            offsets[i] = (offsets[i] + step)
                .clamp(-self.bounds.max_adjustment, self.bounds.max_adjustment);
        }
    }

    /// Base weights plus offsets, clamped and renormalized.
    pub fn weights(&self, intent: Intent) -> IntentWeights {
        let base = self.base.get(intent);
        let offsets = self.offsets[intent.index()];
        if offsets.iter().all(|o| *o == 0.0) {
            return base;
        }
        let mut adjusted = [0.0; Factor::COUNT];
        for (i, slot) in adjusted.iter_mut().enumerate() {
            *slot = (base.0[i] + offsets[i]).max(0.0);
        }
        IntentWeights(adjusted).normalized()
    }

    pub fn table(&self) -> WeightTable {
        let mut table = self.base.clone();
        for intent in Intent::ALL {
            table.set(intent, self.weights(intent));
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AdjustmentState {
        AdjustmentState::new(
            WeightTable::default(),
            AdjustmentBounds::from_config(&AdaptiveConfig::default()),
        )
    }

    #[test]
    fn step_is_bounded() {
        let mut state = state();
        let mut signal = [0.0; Factor::COUNT];
        signal[Factor::TextRelevance.index()] = 10.0;
        state.apply(Intent::Debug, &signal);
        assert!((state.offset(Intent::Debug, Factor::TextRelevance) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn total_adjustment_is_bounded() {
        let mut state = state();
        let mut signal = [0.0; Factor::COUNT];
        signal[Factor::QualityScore.index()] = 1.0;
        for _ in 0..100 {
            state.apply(Intent::Debug, &signal);
        }
        assert!((state.offset(Intent::Debug, Factor::QualityScore) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn adjusted_rows_stay_valid() {
        let mut state = state();
        let mut signal = [0.0; Factor::COUNT];
        signal[Factor::RecencyScore.index()] = -1.0;
        signal[Factor::TextRelevance.index()] = 1.0;
        for _ in 0..50 {
            state.apply(Intent::Implement, &signal);
        }
        let table = state.table();
        assert!(table.validate().is_ok());
        assert_eq!(table.get(Intent::Implement).get(Factor::RecencyScore), 0.0);
        assert_eq!(table.get(Intent::Debug), WeightTable::default().get(Intent::Debug));
    }
}

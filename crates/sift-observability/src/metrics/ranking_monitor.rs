//! Ranking bias monitor.
//!
//! Keeps a sliding window of ranking passes. For each pass it stores the score
//! distribution and the factor that contributed most to the top result, so a
//! factor that keeps winning (e.g. proximity) shows up as a high dominance ratio.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use sift_core::config::defaults;
use sift_core::models::Factor;
use sift_core::Intent;

/// Summary of the final scores from one ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl ScoreDistribution {
    /// `None` for an empty slice. Non-finite scores are ignored.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let count = finite.len();
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = finite.iter().sum::<f64>() / count as f64;
        let variance = finite.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / count as f64;
        Some(Self {
            count,
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RankingObservation {
    intent: Intent,
    distribution: ScoreDistribution,
    dominant: Option<Factor>,
}

/// Sliding-window record of ranking passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingMonitor {
    window: usize,
    observations: VecDeque<RankingObservation>,
}

impl Default for RankingMonitor {
    fn default() -> Self {
        Self::new(defaults::DEFAULT_MONITOR_WINDOW)
    }
}

impl RankingMonitor {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            observations: VecDeque::new(),
        }
    }

    /// Record one ranking pass. Empty passes are ignored.
    pub fn record(&mut self, intent: Intent, scores: &[f64], dominant: Option<Factor>) {
        let Some(distribution) = ScoreDistribution::from_scores(scores) else {
            return;
        };
        if self.observations.len() == self.window {
            self.observations.pop_front();
        }
        self.observations.push_back(RankingObservation {
            intent,
            distribution,
            dominant,
        });
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn clear(&mut self) {
        self.observations.clear();
    }

    /// Share of recorded passes in which each factor dominated the top result.
    pub fn dominance(&self) -> HashMap<Factor, f64> {
        let with_dominant: Vec<Factor> =
            self.observations.iter().filter_map(|o| o.dominant).collect();
        let mut ratios = HashMap::new();
        if with_dominant.is_empty() {
            return ratios;
        }
        let total = with_dominant.len() as f64;
        for factor in with_dominant {
            *ratios.entry(factor).or_insert(0.0) += 1.0 / total;
        }
        ratios
    }

    /// Factors whose dominance ratio exceeds `threshold`, highest first.
    pub fn biased_factors(&self, threshold: f64) -> Vec<(Factor, f64)> {
        let mut biased: Vec<(Factor, f64)> = self
            .dominance()
            .into_iter()
            .filter(|(_, ratio)| *ratio > threshold)
            .collect();
        biased.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        biased
    }

    /// Mean of the per-pass mean scores, optionally restricted to one intent.
    pub fn mean_score(&self, intent: Option<Intent>) -> Option<f64> {
        let means: Vec<f64> = self
            .observations
            .iter()
            .filter(|o| intent.map_or(true, |i| o.intent == i))
            .map(|o| o.distribution.mean)
            .collect();
        if means.is_empty() {
            return None;
        }
        Some(means.iter().sum::<f64>() / means.len() as f64)
    }

    pub fn latest(&self) -> Option<ScoreDistribution> {
        self.observations.back().map(|o| o.distribution)
    }
}

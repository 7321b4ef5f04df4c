use sift_core::models::{Factor, RankingFactors};

use super::weights::IntentWeights;

/// `Σ value·weight·confidence / Σ weight·confidence`; zero when nothing carries weight.
pub fn weighted_score(factors: &RankingFactors, weights: &IntentWeights) -> f64 {
    let (numerator, denominator) =
        factors
            .iter()
            .fold((0.0, 0.0), |(num, den), (factor, validated)| {
                let effective = weights.get(factor) * validated.confidence();
                (num + validated.value() * effective, den + effective)
            });
    if denominator > 0.0 {
        (numerator / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Factor with the largest weighted contribution.
pub fn dominant_factor(factors: &RankingFactors, weights: &IntentWeights) -> Option<Factor> {
    factors
        .iter()
        .map(|(factor, v)| (factor, v.value() * weights.get(factor) * v.confidence()))
        .filter(|(_, contribution)| *contribution > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(factor, _)| factor)
}

use sift_core::models::RankingFactors;

use super::weights::IntentWeights;

const TOP_FACTORS: usize = 3;

/// Top contributing factors as `"Label: 0.xx (NN% conf)"`, joined by `" | "`.
/// The confidence suffix is omitted at full confidence.
pub fn explain(factors: &RankingFactors, weights: &IntentWeights) -> String {
    let mut contributions: Vec<_> = factors
        .iter()
        .map(|(factor, validated)| {
            let contribution = validated.value() * weights.get(factor) * validated.confidence();
            (factor, validated, contribution)
        })
        .collect();
    contributions.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

    contributions
        .into_iter()
        .take(TOP_FACTORS)
        .map(|(factor, validated, _)| {
            if validated.confidence() >= 1.0 {
                format!("{}: {:.2}", factor.label(), validated.value())
            } else {
                format!(
                    "{}: {:.2} ({:.0}% conf)",
                    factor.label(),
                    validated.value(),
                    validated.confidence() * 100.0
                )
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

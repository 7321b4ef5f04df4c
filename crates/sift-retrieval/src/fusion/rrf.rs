//! Weighted Reciprocal Rank Fusion with hybrid scoring.
//!
//! Per stage at list position `p` with weight `w = stage_weight(p)`, a candidate
//! at 0-based rank `r` contributes
//! `rrf_blend * w / (k + r + 1) + score_blend * w * score / max_score`.
//! Contributions are summed across stages. Only the first occurrence of an id
//! within one stage counts.

use std::collections::{HashMap, HashSet};

use sift_core::config::FusionConfig;
use sift_core::models::{Candidate, StageOutput};

pub fn fuse_rankings(outputs: &[StageOutput], config: &FusionConfig) -> Vec<Candidate> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for (position, output) in outputs.iter().enumerate() {
        let weight = config.stage_weight(position);
        let max_score = output
            .candidates
            .iter()
            .map(|c| c.score)
            .filter(|s| s.is_finite())
            .fold(0.0_f64, f64::max);

        let mut seen: HashSet<&str> = HashSet::new();
        for (rank, candidate) in output.candidates.iter().enumerate() {
            if !seen.insert(candidate.id.as_str()) {
                continue;
            }
            let normalized = if max_score > 0.0 && candidate.score.is_finite() {
                (candidate.score / max_score).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let contribution = config.rrf_blend * weight / (config.rrf_k + rank as f64 + 1.0)
                + config.score_blend * weight * normalized;

            let entry = totals.entry(candidate.id.as_str()).or_insert_with(|| {
                order.push(candidate.id.as_str());
                0.0
            });
            *entry += contribution;
        }
    }

    let mut fused: Vec<Candidate> = order
        .into_iter()
        .map(|id| Candidate::new(id, totals.get(id).copied().unwrap_or(0.0)))
        .collect();
    fused.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    fused.truncate(config.top_k);
    fused
}

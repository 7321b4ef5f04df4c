//! Budget pruning ahead of fusion.
//!
//! When the combined candidate count times the per-document token estimate
//! exceeds the budget, each stage keeps a share proportional to its size. A
//! stage that returned anything keeps at least one candidate while the budget
//! is positive.

use sift_core::models::StageOutput;
use tracing::debug;

pub fn prune_to_budget(outputs: &mut [StageOutput], budget: usize, tokens_per_document: usize) {
    let total: usize = outputs.iter().map(StageOutput::len).sum();
    if total == 0 || total.saturating_mul(tokens_per_document) <= budget {
        return;
    }

    let allowed = budget / tokens_per_document.max(1);
    for output in outputs.iter_mut() {
        let len = output.len();
        if len == 0 {
            continue;
        }
        let share = len * allowed / total;
        let keep = if budget > 0 { share.max(1) } else { 0 };
        output.truncate(keep);
    }
    debug!(
        before = total,
        after = outputs.iter().map(StageOutput::len).sum::<usize>(),
        budget,
        "pruned stage outputs"
    );
}

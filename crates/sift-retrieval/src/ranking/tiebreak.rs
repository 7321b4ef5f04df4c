//! Deterministic result ordering.
//!
//! Descending final score, then descending original score, then longer
//! snippet, then file path ascending (results without a path sort last).

use std::cmp::Ordering;

use sift_core::models::FusedResult;

pub fn compare(a: &FusedResult, b: &FusedResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.original_score.total_cmp(&a.original_score))
        .then_with(|| b.snippet_len().cmp(&a.snippet_len()))
        .then_with(|| match (a.file_path.as_deref(), b.file_path.as_deref()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Stable sort by [`compare`].
pub fn sort_results(results: &mut [FusedResult]) {
    results.sort_by(compare);
}

//! Per-factor learning signal from interaction records.
//!
//! For a record, the signal of a factor is the mean value over selected
//! results minus the mean over everything shown: positive when selections
//! scored high on that factor. A rejected list flips the sign, with the top
//! shown result standing in for the selection when nothing was picked.
//! Abandoned lists carry no signal.

use std::collections::HashSet;

use sift_core::models::{Factor, FactorValues, InteractionOutcome, InteractionRecord};

/// Mean per-factor signal over `records`, or `None` when no record carried one.
pub fn factor_signals<'a>(
    records: impl IntoIterator<Item = &'a InteractionRecord>,
) -> Option<[f64; Factor::COUNT]> {
    let mut totals = [0.0; Factor::COUNT];
    let mut counted = 0usize;
    for record in records {
        if let Some(signal) = record_signal(record) {
            for (total, value) in totals.iter_mut().zip(signal) {
                *total += value;
            }
            counted += 1;
        }
    }
    (counted > 0).then(|| totals.map(|t| t / counted as f64))
}

pub fn record_signal(record: &InteractionRecord) -> Option<[f64; Factor::COUNT]> {
    if record.results_shown.is_empty() || record.outcome == InteractionOutcome::Abandoned {
        return None;
    }
    let selected_ids: HashSet<&str> = record.results_selected.iter().map(String::as_str).collect();
    let mut selected: Vec<&FactorValues> = record
        .results_shown
        .iter()
        .filter(|(id, _)| selected_ids.contains(id.as_str()))
        .map(|(_, values)| values)
        .collect();

    let sign = match record.outcome {
        InteractionOutcome::Accepted => 1.0,
        InteractionOutcome::Rejected => -1.0,
        InteractionOutcome::Abandoned => return None,
    };
    if selected.is_empty() {
        if record.outcome != InteractionOutcome::Rejected {
            return None;
        }
        selected.push(&record.results_shown[0].1);
    }

    let shown: Vec<&FactorValues> = record.results_shown.iter().map(|(_, v)| v).collect();
    let selected_mean = mean(&selected);
    let shown_mean = mean(&shown);
    let mut signal = [0.0; Factor::COUNT];
    for factor in Factor::ALL {
        let i = factor.index();
        signal[i] = sign * (selected_mean[i] - shown_mean[i]);
    }
    Some(signal)
}

fn mean(values: &[&FactorValues]) -> [f64; Factor::COUNT] {
    let mut sums = [0.0; Factor::COUNT];
    for v in values {
        for (sum, x) in sums.iter_mut().zip(v.0) {
            *sum += x;
        }
    }
    let n = values.len().max(1) as f64;
    sums.map(|s| s / n)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sift_core::Intent;

    use super::*;

    fn values(text: f64, proximity: f64) -> FactorValues {
        let mut v = [0.5; Factor::COUNT];
        v[Factor::TextRelevance.index()] = text;
        v[Factor::ProximityScore.index()] = proximity;
        FactorValues(v)
    }

    fn record(outcome: InteractionOutcome, selected: &[&str]) -> InteractionRecord {
        InteractionRecord {
            query: "q".into(),
            intent: Intent::Debug,
            results_shown: vec![
                ("a".into(), values(0.9, 0.1)),
                ("b".into(), values(0.1, 0.9)),
            ],
            results_selected: selected.iter().map(|s| s.to_string()).collect(),
            context: None,
            outcome,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn accepted_selection_rewards_its_strong_factors() {
        let signal = record_signal(&record(InteractionOutcome::Accepted, &["a"])).unwrap();
        assert!((signal[Factor::TextRelevance.index()] - 0.4).abs() < 1e-12);
        assert!((signal[Factor::ProximityScore.index()] + 0.4).abs() < 1e-12);
        assert_eq!(signal[Factor::QualityScore.index()], 0.0);
    }

    #[test]
    fn rejection_inverts_using_top_result() {
        let signal = record_signal(&record(InteractionOutcome::Rejected, &[])).unwrap();
        assert!((signal[Factor::TextRelevance.index()] + 0.4).abs() < 1e-12);
    }

    #[test]
    fn abandoned_and_unselected_carry_no_signal() {
        assert!(record_signal(&record(InteractionOutcome::Abandoned, &["a"])).is_none());
        assert!(record_signal(&record(InteractionOutcome::Accepted, &[])).is_none());
        assert!(factor_signals(&[record(InteractionOutcome::Abandoned, &["a"])]).is_none());
    }
}

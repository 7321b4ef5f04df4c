use proptest::prelude::*;
use sift_tokens::{HeuristicEstimator, TokenBudget, TokenCounter};

proptest! {
    #[test]
    fn heuristic_is_at_least_one(s in ".*") {
        prop_assert!(HeuristicEstimator::estimate(&s) >= 1);
    }

    #[test]
    fn heuristic_is_monotonic_in_length(s in ".{0,200}", extra in ".{0,50}") {
        let longer = format!("{}{}", s, extra);
        prop_assert!(HeuristicEstimator::estimate(&longer) >= HeuristicEstimator::estimate(&s));
    }

    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::with_default_capacity().unwrap();
        prop_assert_eq!(counter.count(&s), counter.count_cached(&s));
    }

    #[test]
    fn charged_tokens_never_exceed_limit(
        items in proptest::collection::vec(".{0,120}", 0..20),
        limit in 0usize..200,
    ) {
        let estimator = HeuristicEstimator;
        let mut budget = TokenBudget::new(&estimator, limit, "\n\n");
        for item in &items {
            budget.try_charge(item);
        }
        prop_assert!(budget.used() <= limit);
        prop_assert_eq!(budget.used() + budget.remaining(), limit);
    }
}

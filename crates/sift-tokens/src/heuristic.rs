use sift_core::traits::ITokenizer;

const CHARS_PER_TOKEN: usize = 4;

/// Length-based token estimate: one token per four characters, never below one.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl HeuristicEstimator {
    pub fn estimate(text: &str) -> usize {
        (text.chars().count() / CHARS_PER_TOKEN).max(1)
    }
}

impl ITokenizer for HeuristicEstimator {
    fn count(&self, text: &str) -> usize {
        Self::estimate(text)
    }
}

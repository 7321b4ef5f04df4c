//! # sift-tokens
//!
//! Token estimation for context budgeting.
//! [`HeuristicEstimator`] applies the `max(1, chars / 4)` rule used when no
//! tokenizer is supplied; [`TokenCounter`] counts exactly with `tiktoken-rs`
//! (`cl100k_base`) and caches results per blake3 content hash.

pub mod budget;
pub mod counter;
pub mod heuristic;

pub use budget::TokenBudget;
pub use counter::TokenCounter;
pub use heuristic::HeuristicEstimator;

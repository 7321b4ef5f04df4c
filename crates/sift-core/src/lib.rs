//! # sift-core
//!
//! Foundation crate for the sift retrieval pipeline.
//! Defines all types, traits, errors, config, and defaults.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod intent;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::SiftConfig;
pub use errors::{SiftError, SiftResult};
pub use intent::{Intent, StageKind};
pub use models::{
    Candidate, CandidateMetadata, CodeContext, FusedResult, Query, RankingFactors,
    ValidatedFactor,
};

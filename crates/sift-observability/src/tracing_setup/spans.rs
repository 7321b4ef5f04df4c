//! Span definitions per operation: pipeline run, retrieval stage, ranking pass.

/// Create a span covering one pipeline run.
#[macro_export]
macro_rules! pipeline_span {
    ($query:expr) => {
        tracing::info_span!("sift.pipeline", query = %$query)
    };
}

/// Create a span for a single retrieval stage.
#[macro_export]
macro_rules! stage_span {
    ($stage:expr) => {
        tracing::info_span!("sift.stage", stage = %$stage)
    };
}

/// Create a span for a ranking pass.
#[macro_export]
macro_rules! ranking_span {
    ($intent:expr, $candidates:expr) => {
        tracing::info_span!("sift.ranking", intent = %$intent, candidates = $candidates)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const PIPELINE: &str = "sift.pipeline";
    pub const STAGE: &str = "sift.stage";
    pub const RANKING: &str = "sift.ranking";
}

mod config_error;
mod ranking_error;
mod retrieval_error;
mod search_error;

pub use config_error::ConfigError;
pub use ranking_error::RankingError;
pub use retrieval_error::RetrievalError;
pub use search_error::{ErrorKind, SearchError};

/// Top-level error type for the sift pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    #[error("search error: {0}")]
    SearchError(#[from] SearchError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("ranking error: {0}")]
    RankingError(#[from] RankingError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("analysis failed for {path}: {reason}")]
    AnalysisFailed { path: String, reason: String },

    #[error("feedback store error: {reason}")]
    FeedbackStore { reason: String },

    #[error("tokenizer unavailable: {reason}")]
    TokenizerUnavailable { reason: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Convenience alias used throughout the workspace.
pub type SiftResult<T> = Result<T, SiftError>;

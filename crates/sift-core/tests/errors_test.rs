use std::time::Duration;

use sift_core::errors::*;
use sift_core::{Intent, StageKind};

#[test]
fn search_error_http_carries_status() {
    let err = SearchError::Http {
        status: 503,
        message: "unavailable".into(),
    };
    assert!(err.to_string().contains("503"));
    assert_eq!(err.kind(), ErrorKind::Retryable);
}

#[test]
fn timeout_is_retryable_and_trips_breaker() {
    let err = SearchError::Timeout {
        elapsed: Duration::from_millis(250),
    };
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_retryable());
    assert!(err.trips_breaker());
}

#[test]
fn transport_errors_are_retryable() {
    let err = SearchError::Transport {
        reason: "connection reset".into(),
    };
    assert!(err.is_retryable());
}

#[test]
fn retrieval_error_stage_missing_carries_stage() {
    let err = RetrievalError::StageMissing {
        stage: StageKind::Dependency,
    };
    assert!(err.to_string().contains("dependency"));
}

#[test]
fn ranking_error_carries_intent() {
    let err = RankingError::MissingWeights {
        intent: Intent::Refactor,
    };
    assert!(err.to_string().contains("refactor"));
}

// --- From impls ---

#[test]
fn search_error_converts_to_sift_error() {
    let err: SiftError = SearchError::InvalidRequest {
        reason: "empty".into(),
    }
    .into();
    assert!(matches!(err, SiftError::SearchError(_)));
}

#[test]
fn ranking_error_converts_to_sift_error() {
    let err: SiftError = RankingError::Failed {
        reason: "boom".into(),
    }
    .into();
    assert!(matches!(err, SiftError::RankingError(_)));
}

#[test]
fn config_error_converts_to_sift_error() {
    let err: SiftError = ConfigError::Parse {
        reason: "bad".into(),
    }
    .into();
    assert!(matches!(err, SiftError::ConfigError(_)));
}

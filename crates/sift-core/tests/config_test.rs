use sift_core::config::*;
use sift_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = SiftConfig::from_toml("").unwrap();

    // Retrieval defaults
    assert_eq!(config.retrieval.result_limit, 10);
    assert_eq!(config.retrieval.stage_top_n, 50);
    assert_eq!(config.retrieval.max_query_variants, 15);

    // Fusion defaults
    assert_eq!(config.fusion.rrf_k, 60.0);
    assert_eq!(config.fusion.stage_weights, vec![1.0, 0.8, 0.6, 0.4, 0.3]);
    assert_eq!(config.fusion.rrf_blend, 0.7);
    assert_eq!(config.fusion.score_blend, 0.3);
    assert_eq!(config.fusion.top_k, 20);
    assert_eq!(config.fusion.pruning_budget, 3_500);
    assert_eq!(config.fusion.tokens_per_document, 200);
    assert_eq!(config.fusion.effective_context_budget(), 2_800);

    // Resilience defaults
    assert_eq!(config.resilience.stage_timeout_ms, 5_000);
    assert_eq!(config.resilience.max_attempts, 3);

    // Cache defaults
    assert_eq!(config.cache.capacity, 10_000);
    assert_eq!(config.cache.ttl_secs, 600);

    // Adaptive defaults
    assert!(!config.adaptive.enabled);
    assert_eq!(config.adaptive.max_adjustment, 0.2);
    assert_eq!(config.adaptive.max_step, 0.05);
    assert_eq!(config.adaptive.recalc_every_queries, 100);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[fusion]
rrf_k = 30.0
top_k = 5

[resilience]
max_attempts = 5
"#;
    let config = SiftConfig::from_toml(toml).unwrap();
    assert_eq!(config.fusion.rrf_k, 30.0);
    assert_eq!(config.fusion.top_k, 5);
    assert_eq!(config.resilience.max_attempts, 5);
    // Untouched sections keep defaults.
    assert_eq!(config.fusion.tokens_per_document, 200);
    assert_eq!(config.cache.capacity, 10_000);
}

#[test]
fn stage_weight_reuses_last_entry_past_table_end() {
    let config = FusionConfig::default();
    assert_eq!(config.stage_weight(0), 1.0);
    assert_eq!(config.stage_weight(4), 0.3);
    assert_eq!(config.stage_weight(9), 0.3);
}

#[test]
fn negative_stage_weight_is_rejected() {
    let toml = r#"
[fusion]
stage_weights = [1.0, -0.5]
"#;
    let err = SiftConfig::from_toml(toml).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "fusion.stage_weights"));
}

#[test]
fn budget_smaller_than_margin_is_rejected() {
    let toml = r#"
[fusion]
context_budget = 100
context_safety_margin = 200
"#;
    assert!(SiftConfig::from_toml(toml).is_err());
}

#[test]
fn learning_rate_out_of_range_is_rejected() {
    let toml = r#"
[adaptive]
learning_rate = 1.5
"#;
    assert!(SiftConfig::from_toml(toml).is_err());
}

#[test]
fn malformed_toml_reports_parse_error() {
    let err = SiftConfig::from_toml("[fusion\nrrf_k = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

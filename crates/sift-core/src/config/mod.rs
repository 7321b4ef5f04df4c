pub mod adaptive_config;
pub mod cache_config;
pub mod defaults;
pub mod fusion_config;
pub mod observability_config;
pub mod ranking_config;
pub mod resilience_config;
pub mod retrieval_config;

pub use adaptive_config::AdaptiveConfig;
pub use cache_config::CacheConfig;
pub use fusion_config::FusionConfig;
pub use observability_config::ObservabilityConfig;
pub use ranking_config::RankingConfig;
pub use resilience_config::ResilienceConfig;
pub use retrieval_config::RetrievalConfig;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub retrieval: RetrievalConfig,
    pub fusion: FusionConfig,
    pub resilience: ResilienceConfig,
    pub cache: CacheConfig,
    pub ranking: RankingConfig,
    pub adaptive: AdaptiveConfig,
    pub observability: ObservabilityConfig,
}

impl SiftConfig {
    /// Load config from a TOML string. Missing fields use defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fusion = &self.fusion;
        if fusion.stage_weights.is_empty() {
            return Err(invalid("fusion.stage_weights", "must not be empty"));
        }
        if fusion
            .stage_weights
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(invalid(
                "fusion.stage_weights",
                "weights must be finite and non-negative",
            ));
        }
        if !(fusion.rrf_k.is_finite() && fusion.rrf_k >= 0.0) {
            return Err(invalid("fusion.rrf_k", "must be finite and non-negative"));
        }
        if fusion.tokens_per_document == 0 {
            return Err(invalid("fusion.tokens_per_document", "must be positive"));
        }
        if fusion.context_budget <= fusion.context_safety_margin {
            return Err(invalid(
                "fusion.context_budget",
                "must exceed context_safety_margin",
            ));
        }
        if self.resilience.max_attempts == 0 {
            return Err(invalid("resilience.max_attempts", "must be at least 1"));
        }
        if self.resilience.failure_threshold == 0 {
            return Err(invalid("resilience.failure_threshold", "must be at least 1"));
        }
        let adaptive = &self.adaptive;
        if !(adaptive.learning_rate > 0.0 && adaptive.learning_rate <= 1.0) {
            return Err(invalid("adaptive.learning_rate", "must be in (0, 1]"));
        }
        if adaptive.max_step < 0.0 || adaptive.max_adjustment < 0.0 {
            return Err(invalid("adaptive", "adjustment bounds must be non-negative"));
        }
        if adaptive.channel_capacity == 0 {
            return Err(invalid("adaptive.channel_capacity", "must be positive"));
        }
        if self.ranking.complexity_ceiling <= 0.0 {
            return Err(invalid("ranking.complexity_ceiling", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

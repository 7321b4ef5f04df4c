use serde::{Deserialize, Serialize};

use super::defaults;

/// Stage execution and query-shaping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Final number of results returned when the query does not set one.
    pub result_limit: usize,
    /// Per-stage candidate cap for index-backed stages.
    pub stage_top_n: usize,
    /// How many enhanced variants the keyword stage folds into its search text.
    pub keyword_variants: usize,
    /// Semantic configuration name passed to the index for semantic search.
    pub semantic_config: String,
    /// Upper bound on enhanced query variants.
    pub max_query_variants: usize,
    /// Enable query enhancement.
    pub query_enhancement: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            result_limit: defaults::DEFAULT_RESULT_LIMIT,
            stage_top_n: defaults::DEFAULT_STAGE_TOP_N,
            keyword_variants: defaults::DEFAULT_KEYWORD_VARIANTS,
            semantic_config: defaults::DEFAULT_SEMANTIC_CONFIG.to_string(),
            max_query_variants: defaults::DEFAULT_MAX_QUERY_VARIANTS,
            query_enhancement: true,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Contextual ranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Complexity at which the inverse-complexity quality signal bottoms out.
    pub complexity_ceiling: f64,
    /// Apply logarithmic damping to the proximity factor.
    pub proximity_damping: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            complexity_ceiling: defaults::DEFAULT_COMPLEXITY_CEILING,
            proximity_damping: defaults::DEFAULT_PROXIMITY_DAMPING,
        }
    }
}

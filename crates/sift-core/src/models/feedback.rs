use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::CodeContext;
use super::factors::FactorValues;
use crate::intent::Intent;

/// What the user did with a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// A selected result solved the task.
    Accepted,
    /// Results were shown and explicitly rejected.
    Rejected,
    /// The user left without acting on the results.
    Abandoned,
}

/// One recorded interaction with a ranked result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub query: String,
    pub intent: Intent,
    /// Shown results, in display order, with the factor values they were ranked on.
    pub results_shown: Vec<(String, FactorValues)>,
    pub results_selected: Vec<String>,
    pub context: Option<CodeContext>,
    pub outcome: InteractionOutcome,
    pub timestamp: DateTime<Utc>,
}

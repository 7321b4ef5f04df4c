//! Static intent → stage table.
//!
//! Order matters: fusion weights are assigned by position in this list, so
//! reordering an entry changes how much each stage counts for that intent.

use sift_core::{Intent, StageKind};

const IMPLEMENT: &[StageKind] = &[StageKind::Vector, StageKind::Keyword];
const DEBUG: &[StageKind] = &[StageKind::Keyword, StageKind::Vector];
const UNDERSTAND: &[StageKind] = &[StageKind::Semantic, StageKind::Vector, StageKind::Keyword];
const REFACTOR: &[StageKind] = &[StageKind::Pattern, StageKind::Vector, StageKind::Keyword];
const TEST: &[StageKind] = &[StageKind::Keyword, StageKind::Vector, StageKind::Pattern];
const DOCUMENT: &[StageKind] = &[StageKind::Semantic, StageKind::Keyword];

pub fn stages_for(intent: Intent) -> &'static [StageKind] {
    match intent {
        Intent::Implement => IMPLEMENT,
        Intent::Debug => DEBUG,
        Intent::Understand => UNDERSTAND,
        Intent::Refactor => REFACTOR,
        Intent::Test => TEST,
        Intent::Document => DOCUMENT,
    }
}

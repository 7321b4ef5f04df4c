use sift_core::{Intent, StageKind};

#[test]
fn intent_all_has_count_entries() {
    assert_eq!(Intent::ALL.len(), Intent::COUNT);
}

#[test]
fn intent_serializes_snake_case() {
    let json = serde_json::to_string(&Intent::Implement).unwrap();
    assert_eq!(json, "\"implement\"");
    let back: Intent = serde_json::from_str("\"document\"").unwrap();
    assert_eq!(back, Intent::Document);
}

#[test]
fn intent_display_matches_as_str() {
    for intent in Intent::ALL {
        assert_eq!(intent.to_string(), intent.as_str());
    }
}

#[test]
fn stage_kinds_are_distinct() {
    let names: std::collections::HashSet<&str> =
        StageKind::ALL.iter().map(|s| s.as_str()).collect();
    assert_eq!(names.len(), StageKind::ALL.len());
}

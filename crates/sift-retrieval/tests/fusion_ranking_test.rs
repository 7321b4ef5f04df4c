//! Fusion, context assembly and ranking invariants on hand-built inputs.

use std::sync::Arc;

use sift_core::config::{FusionConfig, RankingConfig};
use sift_core::models::{Candidate, CandidateMetadata, CodeContext, Query, StageOutput};
use sift_core::{Intent, StageKind};
use sift_retrieval::ranking::tiebreak::sort_results;
use sift_retrieval::ranking::WeightTable;
use sift_retrieval::{ContextAssembler, ContextualRanker, FusionEngine, PatternRegistry, Ranker};
use test_fixtures::result;

fn stage(kind: StageKind, entries: &[(&str, f64, &str)]) -> StageOutput {
    let mut out = StageOutput::empty(kind);
    for (id, score, content) in entries {
        out.push(
            Candidate::new(*id, *score),
            CandidateMetadata {
                content: Some(content.to_string()),
                file_path: Some(format!("/src/{id}.py")),
                ..Default::default()
            },
        );
    }
    out
}

fn ranker() -> ContextualRanker {
    ContextualRanker::new(RankingConfig::default(), Arc::new(PatternRegistry::new()))
}

#[tokio::test]
async fn duplicated_stage_output_fuses_to_unique_ids() {
    let keyword = stage(
        StageKind::Keyword,
        &[("a", 9.0, "def a(): pass"), ("b", 5.0, "def b(): pass"), ("c", 1.0, "def c(): pass")],
    );
    let fused = FusionEngine::new(FusionConfig::default())
        .fuse(vec![keyword.clone(), keyword])
        .await;

    let ids: Vec<&str> = fused.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn candidate_in_two_stages_outranks_single_stage_peers() {
    let vector = stage(
        StageKind::Vector,
        &[("shared", 0.8, "def shared(): pass"), ("v_only", 0.9, "def v(): pass")],
    );
    let keyword = stage(
        StageKind::Keyword,
        &[("k_only", 4.0, "def k(): pass"), ("shared", 3.0, "def shared(): pass")],
    );
    let fused = FusionEngine::new(FusionConfig::default())
        .fuse(vec![vector, keyword])
        .await;
    assert_eq!(fused[0].id, "shared");
    assert_eq!(fused.len(), 3);
}

#[tokio::test]
async fn blank_content_never_survives_fusion() {
    let keyword = stage(
        StageKind::Keyword,
        &[("real", 2.0, "def real(): pass"), ("blank", 9.0, "  \n\t")],
    );
    let fused = FusionEngine::new(FusionConfig::default())
        .fuse(vec![keyword])
        .await;
    let ids: Vec<&str> = fused.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["real"]);
}

#[test]
fn assembled_context_respects_budget() {
    let body = "fn handler(request: Request) -> Response { respond(request) }\n".repeat(8);
    let results: Vec<_> = (0..20)
        .map(|i| result(&format!("r{i}"), &format!("/src/r{i}.rs"), &format!("// {i}\n{body}"), 1.0))
        .collect();

    let assembler = ContextAssembler::new(400, 50);
    let context = assembler.assemble(&results);

    assert!(context.total_tokens <= assembler.effective_budget());
    assert!(!context.citations.is_empty());
    assert!(context.citations.len() < results.len());
    assert_eq!(
        context.text.matches("// /src/").count(),
        context.citations.len()
    );
}

#[test]
fn duplicate_content_is_assembled_once() {
    let results = vec![
        result("a", "/src/a.py", "def cache():\n    return 1", 0.9),
        result("b", "/src/b.py", "def   cache():\n    return 1", 0.8),
        result("a", "/src/a.py", "def cache():\n    return 1", 0.7),
    ];
    let context = ContextAssembler::new(3_000, 200).assemble(&results);
    assert_eq!(context.citations.len(), 1);
    assert_eq!(context.duplicates_removed, 2);
}

#[test]
fn tie_break_prefers_longer_snippet_then_path() {
    let mut results = vec![
        result("short", "/a/short.py", "x = 1", 0.5),
        result("long", "/z/long.py", "x = 1\ny = 2", 0.5),
    ];
    sort_results(&mut results);
    assert_eq!(results[0].id, "long");

    let mut results = vec![
        result("y", "/b/y.py", "same", 0.5),
        result("x", "/a/x.py", "same", 0.5),
    ];
    sort_results(&mut results);
    assert_eq!(results[0].file_path.as_deref(), Some("/a/x.py"));
    assert_eq!(results[1].file_path.as_deref(), Some("/b/y.py"));
}

#[test]
fn every_intent_has_complete_normalized_weights() {
    let table = WeightTable::default();
    table.validate().unwrap();
    let ranker = ranker();
    for intent in Intent::ALL {
        let weights = ranker.weights_for(intent);
        assert!((weights.sum() - 1.0).abs() < 1e-3, "{intent} sums to {}", weights.sum());
        assert!(weights.0.iter().all(|w| *w >= 0.0));
    }
}

#[test]
fn scores_stay_in_unit_interval_for_hostile_inputs() {
    let mut hostile = result("nan", "/src/nan.py", "def nan(): pass", f64::NAN);
    hostile.bm25_score = Some(f64::INFINITY);
    hostile.vector_score = Some(f64::NAN);
    let mut huge = result("huge", "/src/huge.py", "def huge(): return retry()", 1e9);
    huge.semantic_score = Some(1e9);
    huge.test_coverage = Some(1e9);
    let mut negative = result("neg", "/src/neg.py", "def neg(): pass", -5.0);
    negative.vector_score = Some(-0.7);

    let ranked = ranker()
        .rank(
            &Query::new("retry logic"),
            vec![hostile, huge, negative],
            &CodeContext::default(),
            Intent::Implement,
        )
        .unwrap();

    assert_eq!(ranked.len(), 3);
    for r in &ranked {
        assert!(r.score.is_finite() && (0.0..=1.0).contains(&r.score), "{}: {}", r.id, r.score);
        let values = r.factor_values.unwrap();
        assert!(values.0.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

#[test]
fn ranking_is_deterministic_and_explained() {
    let batch = || {
        vec![
            result("a", "/src/cache/lru.py", "class LRUCache:\n    def get(self, key): ...", 0.4),
            result("b", "/src/retry.py", "def retry(fn):\n    for _ in range(3):\n        fn()", 0.6),
            result("c", "/docs/readme.md", "caching notes", 0.2),
        ]
    };
    let context = CodeContext {
        current_file: Some("/src/cache/store.py".into()),
        ..Default::default()
    };
    let query = Query::new("implement caching with retry logic");
    let first = ranker().rank(&query, batch(), &context, Intent::Implement).unwrap();
    let second = ranker().rank(&query, batch(), &context, Intent::Implement).unwrap();

    assert_eq!(first, second);
    assert!(first.iter().all(|r| r.explanation.is_some()));
}

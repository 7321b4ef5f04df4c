use std::collections::HashSet;

use proptest::prelude::*;
use sift_core::config::FusionConfig;
use sift_core::models::{Candidate, CandidateMetadata, FusedResult, StageOutput};
use sift_core::StageKind;
use sift_retrieval::fusion::pruning::prune_to_budget;
use sift_retrieval::fusion::rrf::fuse_rankings;
use sift_retrieval::intent::IntentClassifier;
use sift_retrieval::ranking::tiebreak::sort_results;
use sift_retrieval::ContextAssembler;

fn score() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -10.0f64..100.0,
        1 => Just(f64::NAN),
        1 => Just(1e9),
    ]
}

fn stage_output() -> impl Strategy<Value = StageOutput> {
    (
        prop::sample::select(StageKind::ALL.to_vec()),
        prop::collection::vec((0u8..30, score()), 0..25),
    )
        .prop_map(|(kind, entries)| {
            let mut out = StageOutput::empty(kind);
            for (id, score) in entries {
                out.push(
                    Candidate::new(format!("doc{id}"), score),
                    CandidateMetadata::default(),
                );
            }
            out
        })
}

fn fused_result() -> impl Strategy<Value = FusedResult> {
    (0u8..20, 0.0f64..1.0, 0.0f64..1.0, "[a-z ]{0,40}", prop::option::of("/[a-z]{1,3}/[a-z]{1,3}\\.py"))
        .prop_map(|(id, score, original, snippet, path)| FusedResult {
            id: format!("r{id}"),
            score,
            original_score: original,
            code_snippet: snippet,
            file_path: path,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn fused_ids_are_unique_and_scores_finite(outputs in prop::collection::vec(stage_output(), 0..5)) {
        let config = FusionConfig::default();
        let fused = fuse_rankings(&outputs, &config);
        let ids: HashSet<&str> = fused.iter().map(|c| c.id.as_str()).collect();
        prop_assert_eq!(ids.len(), fused.len());
        prop_assert!(fused.len() <= config.top_k);
        prop_assert!(fused.iter().all(|c| c.score.is_finite()));
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn fusion_is_deterministic(outputs in prop::collection::vec(stage_output(), 0..5)) {
        let config = FusionConfig::default();
        prop_assert_eq!(fuse_rankings(&outputs, &config), fuse_rankings(&outputs, &config));
    }

    #[test]
    fn pruning_never_grows_a_stage(
        mut outputs in prop::collection::vec(stage_output(), 1..5),
        budget in 0usize..5_000,
    ) {
        let before: Vec<usize> = outputs.iter().map(StageOutput::len).collect();
        prune_to_budget(&mut outputs, budget, 200);
        for (out, len) in outputs.iter().zip(before) {
            prop_assert!(out.len() <= len);
            if budget == 0 {
                prop_assert!(out.is_empty());
            }
        }
    }

    #[test]
    fn sorting_is_order_independent(mut results in prop::collection::vec(fused_result(), 0..20)) {
        let mut reversed = results.clone();
        reversed.reverse();
        sort_results(&mut results);
        sort_results(&mut reversed);
        let key = |r: &FusedResult| (r.score.to_bits(), r.original_score.to_bits(), r.code_snippet.len(), r.file_path.clone());
        let a: Vec<_> = results.iter().map(key).collect();
        let b: Vec<_> = reversed.iter().map(key).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn assembled_context_fits_budget(
        results in prop::collection::vec(fused_result(), 0..30),
        budget in 0usize..600,
    ) {
        let assembler = ContextAssembler::new(budget, 0);
        let context = assembler.assemble(&results);
        prop_assert!(context.total_tokens <= budget);
        let cited: HashSet<&str> = context.citations.iter().map(|c| c.id.as_str()).collect();
        prop_assert_eq!(cited.len(), context.citations.len());
    }

    #[test]
    fn classification_never_panics(text in ".{0,120}") {
        let _ = IntentClassifier::new().classify(&text);
    }
}

//! Criterion benchmarks for fusion, context assembly and ranking.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sift_core::config::{FusionConfig, RankingConfig};
use sift_core::models::{Candidate, CandidateMetadata, CodeContext, FusedResult, Query, StageOutput};
use sift_core::{Intent, StageKind};
use sift_retrieval::fusion::rrf::fuse_rankings;
use sift_retrieval::{ContextAssembler, ContextualRanker, PatternRegistry, Ranker};

fn stage(kind: StageKind, offset: usize, n: usize) -> StageOutput {
    let mut out = StageOutput::empty(kind);
    for i in 0..n {
        out.push(
            Candidate::new(format!("doc{}", i + offset), (n - i) as f64),
            CandidateMetadata::default(),
        );
    }
    out
}

fn results(n: usize) -> Vec<FusedResult> {
    (0..n)
        .map(|i| FusedResult {
            id: format!("doc{i}"),
            score: 1.0 / (i + 1) as f64,
            original_score: (n - i) as f64,
            bm25_score: Some((n - i) as f64),
            code_snippet: format!("def handler_{i}(request):\n    return cache.get(request.key) or retry(fetch)\n"),
            file_path: Some(format!("/src/app/module_{}/handler_{i}.py", i % 7)),
            imports: vec!["app.cache".into(), format!("app.module_{}", i % 3)],
            ..Default::default()
        })
        .collect()
}

fn bench_fusion(c: &mut Criterion) {
    let outputs = vec![
        stage(StageKind::Vector, 0, 50),
        stage(StageKind::Keyword, 25, 50),
        stage(StageKind::Semantic, 10, 50),
    ];
    let config = FusionConfig::default();
    c.bench_function("fuse_rankings_3x50", |b| {
        b.iter(|| fuse_rankings(black_box(&outputs), &config))
    });
}

fn bench_assembly(c: &mut Criterion) {
    let batch = results(50);
    let assembler = ContextAssembler::new(3_000, 200);
    c.bench_function("assemble_50", |b| b.iter(|| assembler.assemble(black_box(&batch))));
}

fn bench_ranking(c: &mut Criterion) {
    let ranker = ContextualRanker::new(RankingConfig::default(), Arc::new(PatternRegistry::new()));
    let query = Query::new("implement caching with retry logic");
    let context = CodeContext {
        current_file: Some("/src/app/module_1/service.py".into()),
        imports: vec!["app.cache".into()],
        ..Default::default()
    };
    let batch = results(20);
    c.bench_function("contextual_rank_20", |b| {
        b.iter(|| {
            ranker
                .rank(&query, black_box(batch.clone()), &context, Intent::Implement)
                .ok()
        })
    });
}

criterion_group!(benches, bench_fusion, bench_assembly, bench_ranking);
criterion_main!(benches);

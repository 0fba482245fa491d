//! Benchmarks for the class processing pipeline
//!
//! Three stages are measured separately:
//! 1. Tokenizing - splitting class strings on top-level colons
//! 2. Parsing - cold (fresh caches) versus warm (memoized)
//! 3. Processing - a whole batch through the incremental processor
//!
//! Run with: cargo bench --bench processing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use classjit::jit::{merge_ast_tree_list, tokenize};
use classjit::prelude::*;

// ============================================================================
// Test Data
// ============================================================================

mod data {
    pub const SIMPLE: &str = "p-4";
    pub const STACKED: &str = "group-hover:md:hover:bg-red/50";
    pub const BRACKETED: &str = "supports-[display:grid]:[&>*]:bg-[color:var(--brand)]/40";

    /// A page-sized mix of classes, with repeats
    pub fn page() -> Vec<String> {
        let mut classes = Vec::new();
        for i in 1..=24 {
            classes.push(format!("p-{}", i));
            classes.push(format!("hover:m-{}", i));
            classes.push(format!("md:-mt-{}", i));
            classes.push(format!("w-{}/12", i % 12 + 1));
        }
        for color in ["red", "green", "blue", "gray", "black", "white"] {
            classes.push(format!("bg-{}", color));
            classes.push(format!("dark:text-{}", color));
            classes.push(format!("sm:focus:bg-{}/25", color));
        }
        classes.extend(["flex", "block", "hidden", "underline", "flex", "p-4"].map(String::from));
        classes
    }
}

fn compiler() -> Compiler {
    let mut compiler = Compiler::with_config(CompilerConfig::new().with_minify(true));
    compiler.use_plugin(&BasicPreset);
    compiler
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for (name, input) in [
        ("simple", data::SIMPLE),
        ("stacked", data::STACKED),
        ("bracketed", data::BRACKETED),
    ] {
        group.bench_with_input(BenchmarkId::new("tokenize", name), input, |b, input| {
            b.iter(|| tokenize(black_box(input)))
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    // Cold: a fresh compiler per iteration so every parse misses
    group.bench_with_input(BenchmarkId::new("cold", "stacked"), data::STACKED, |b, input| {
        b.iter_batched(
            compiler,
            |mut compiler| compiler.parse(black_box(input)),
            criterion::BatchSize::SmallInput,
        )
    });

    // Warm: served from the parse cache
    let mut warm = compiler();
    warm.parse(data::STACKED);
    group.bench_function(BenchmarkId::new("warm", "stacked"), |b| {
        b.iter(|| warm.parse(black_box(data::STACKED)))
    });

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let classes = data::page();

    group.bench_function("page_merged", |b| {
        b.iter_batched(
            compiler,
            |mut compiler| {
                let trees: Vec<Vec<AstNode>> = classes
                    .iter()
                    .filter_map(|c| compiler.generate(c).ok())
                    .collect();
                merge_ast_tree_list(&trees)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    let classes = data::page();
    group.throughput(Throughput::Elements(classes.len() as u64));

    group.bench_function("page", |b| {
        b.iter_batched(
            || IncrementalProcessor::new(compiler()),
            |mut processor| processor.process_classes(black_box(&classes)),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_parse,
    bench_generate,
    bench_process
);
criterion_main!(benches);

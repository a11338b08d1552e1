//! Latency benchmarks for the rule engines
//!
//! Run with: cargo bench -p casebrief-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use casebrief_classifiers::{CategoryEngine, RiskEngine};

const SHORT_CLEAN: &str = "Case details, parties, evidence, charges and date recorded.";
const FIR: &str = "FIR No. 221/2023, Police Station Kotwali. The complainant stated that on \
    15/25/2023 at approximately 9 pm, possibly earlier, the accused was around the shop. \
    It is unclear whether the accused was present or absent before the incident.";

fn long_document() -> String {
    let paragraph = "The parties hereby agree that the lessee shall pay rent on the first day \
        of each month. Evidence of payment shall be retained. ";
    paragraph.repeat(200)
}

fn benchmark_risk_engine(c: &mut Criterion) {
    let engine = RiskEngine::new().expect("Failed to create risk engine");
    let long = long_document();
    let cases = [("short_clean", SHORT_CLEAN), ("fir", FIR), ("long", long.as_str())];

    let mut group = c.benchmark_group("Risk_Engine");
    for (name, text) in cases {
        group.bench_with_input(BenchmarkId::new("detect_risks", name), &text, |b, text| {
            b.iter(|| engine.detect_risks(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_category_engine(c: &mut Criterion) {
    let engine = CategoryEngine::new().expect("Failed to create category engine");
    let long = long_document();
    let cases = [("short_clean", SHORT_CLEAN), ("fir", FIR), ("long", long.as_str())];

    let mut group = c.benchmark_group("Category_Engine");
    for (name, text) in cases {
        group.bench_with_input(BenchmarkId::new("classify", name), &text, |b, text| {
            b.iter(|| engine.classify(black_box(text)))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_risk_engine, benchmark_category_engine);
criterion_main!(benches);

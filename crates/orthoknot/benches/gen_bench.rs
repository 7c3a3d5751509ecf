//! Criterion microbenches for diagram constructors and the random braid generator.
//!
//! - Braid: next/regen, closure.
//! - PD code: parse + build.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use orthoknot::diagram::{parse_pd_code, PlanarDiagram, RandomBraidGenerator, RandomBraidParams};

const TREFOIL: &str = "PD[X[1,4,2,5], X[3,6,4,1], X[5,2,6,3]]";

fn bench_braids(c: &mut Criterion) {
    let mut group = c.benchmark_group("braid");
    let params = RandomBraidParams {
        strands: 5,
        length: 40,
        positive_probability: 0.5,
    };
    group.bench_function(BenchmarkId::new("random_braid_next", "5x40"), |b| {
        b.iter_batched(
            || RandomBraidGenerator::new(params.clone(), 11).unwrap(),
            |mut generator| {
                let _ = generator.generate_next().unwrap();
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function(BenchmarkId::new("random_braid_regen", "5x40"), |b| {
        b.iter_batched(
            || {
                let mut generator = RandomBraidGenerator::new(params.clone(), 2025).unwrap();
                let s = generator.generate_next().unwrap();
                (generator, s.replay)
            },
            |(generator, replay)| {
                let _ = generator.regenerate(&replay).unwrap();
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function(BenchmarkId::new("closure", "5x40"), |b| {
        b.iter_batched(
            || RandomBraidGenerator::generate_single(&params, 7).unwrap(),
            |braid| {
                let _ = braid.closure().unwrap();
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_pd(c: &mut Criterion) {
    let mut group = c.benchmark_group("pd");
    group.bench_function(BenchmarkId::new("parse_and_build", "trefoil"), |b| {
        b.iter(|| {
            let code = parse_pd_code(TREFOIL).unwrap();
            PlanarDiagram::from_pd_code(&code).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_braids, bench_pd);
criterion_main!(benches);

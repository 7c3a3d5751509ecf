//! Criterion benchmarks for the layout stages on random braid closures.
//! Focus sizes: word length in {8, 32, 128, 512} on 6 strands.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p orthoknot

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use orthoknot::bends::{optimize_bends, MicroLpSolver};
use orthoknot::diagram::{PlanarDiagram, RandomBraidGenerator, RandomBraidParams};
use orthoknot::faces::FaceSet;
use orthoknot::ortho::{subdivide, Scratch};
use orthoknot::OrthoCfg;

fn random_closure(length: usize, seed: u64) -> PlanarDiagram {
    let params = RandomBraidParams {
        strands: 6,
        length,
        positive_probability: 0.5,
    };
    RandomBraidGenerator::generate_single(&params, seed)
        .unwrap()
        .closure()
        .unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let cfg = OrthoCfg::default();
    for &n in &[8usize, 32, 128, 512] {
        let g = random_closure(n, 17);

        group.bench_with_input(BenchmarkId::new("extract_faces", n), &g, |b, g| {
            b.iter(|| FaceSet::extract(g))
        });

        let faces = FaceSet::extract(&g);
        let exterior = faces.exterior_faces(None);
        group.bench_with_input(BenchmarkId::new("optimize_bends", n), &g, |b, g| {
            b.iter(|| optimize_bends(g, &faces, &exterior, &mut MicroLpSolver, &cfg).unwrap())
        });

        let bends = optimize_bends(&g, &faces, &exterior, &mut MicroLpSolver, &cfg).unwrap();
        group.bench_with_input(BenchmarkId::new("subdivide", n), &g, |b, g| {
            b.iter_batched(
                || Scratch::for_diagram(g, bends.total() as usize),
                |mut scratch| {
                    let _ = subdivide(g, exterior.primary(), bends.values(), &mut scratch);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);

//! Criterion benchmarks for the lifted-hull Delaunay tetrahedralization.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hullkernel::api::create_delaunay_3d;
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn cube_points(n: usize, seed: u64) -> Vec<Vector3<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Vector3::from_fn(|_, _| rng.gen_range(-1.0..1.0)))
        .collect()
}

fn bench_delaunay(c: &mut Criterion) {
    let mut group = c.benchmark_group("delaunay3");
    group.sample_size(20);
    for &n in &[50usize, 200, 1_000] {
        for reuse in [true, false] {
            let label = if reuse { "reuse" } else { "compact" };
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, &n| {
                b.iter_batched(
                    || cube_points(n, 99),
                    |pts| {
                        let m = create_delaunay_3d(&pts, reuse).unwrap();
                        black_box(m.num_tetrahedra());
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_delaunay);
criterion_main!(benches);

//! Criterion benchmarks for `nbg-math`.
//!
//! The per-sweep theta redraw is a V-dimensional Dirichlet draw per class.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nbg_math::dirichlet::{log_marginal_likelihood, sample, DirichletParams};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_dirichlet_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("dirichlet");

    for vocab in [1_000usize, 10_000, 50_000] {
        let params = DirichletParams::symmetric(vocab, 1.0).expect("valid params");
        let counts: Vec<u64> = (0..vocab as u64).map(|i| i % 7).collect();

        group.bench_with_input(BenchmarkId::new("sample", vocab), &params, |b, p| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter(|| black_box(sample(black_box(p), &mut rng)));
        });

        group.bench_with_input(
            BenchmarkId::new("log_marginal_likelihood", vocab),
            &(params, counts),
            |b, (p, n)| {
                b.iter(|| black_box(log_marginal_likelihood(black_box(p), black_box(n))));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_dirichlet_kernels);
criterion_main!(benches);

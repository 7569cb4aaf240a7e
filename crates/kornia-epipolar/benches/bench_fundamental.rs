use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kornia_epipolar::metrics::evaluate;
use kornia_epipolar::points::Correspondences;
use kornia_epipolar::{fundamental_8point, FundamentalParams};

/// Generate synthetic correspondences of a camera translated along x.
fn generate_data(n: usize) -> Correspondences {
    let mut x1 = Vec::with_capacity(n);
    let mut x2 = Vec::with_capacity(n);
    for i in 0..n {
        let i = i as f64;
        let p = [(1.3 * i).sin() * 2.0, (2.1 * i).cos() * 1.5, 6.0 + (0.7 * i).sin() * 2.0];
        let q = [p[0] - 1.0, p[1], p[2]];
        x1.push([500.0 * p[0] / p[2] + 320.0, 500.0 * p[1] / p[2] + 240.0]);
        x2.push([500.0 * q[0] / q[2] + 320.0, 500.0 * q[1] / q[2] + 240.0]);
    }
    Correspondences::from_points(&x1, &x2).expect("enough correspondences")
}

fn bench_fundamental_8point(c: &mut Criterion) {
    let mut group = c.benchmark_group("fundamental_8point");
    for &n in &[8, 50, 200] {
        let data = generate_data(n);
        for (name, params) in [
            ("normalized", FundamentalParams::default()),
            ("regular", FundamentalParams::unnormalized()),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, _| {
                b.iter(|| std::hint::black_box(fundamental_8point(&data, &params)));
            });
        }
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for &n in &[8, 200, 1000] {
        let data = generate_data(n);
        let Ok(f) = fundamental_8point(&data, &FundamentalParams::default()) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| std::hint::black_box(evaluate(&f, &data)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fundamental_8point, bench_evaluate);
criterion_main!(benches);

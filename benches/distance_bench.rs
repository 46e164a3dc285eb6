use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tsa_rs::{
    dtw, euclidean, manhattan, mass, moving_mean_stdev, sliding_dot_product_fft,
    sliding_dot_product_naive, stamp_self, Engine, MatrixProfileConfig, SeriesBatch, Sequential,
};

fn sine_batch(count: usize, len: usize) -> SeriesBatch {
    let series: Vec<Vec<f64>> = (0..count)
        .map(|s| (0..len).map(|t| ((s * 13 + t) as f64 * 0.1).sin()).collect())
        .collect();
    let refs: Vec<&[f64]> = series.iter().map(|v| v.as_slice()).collect();
    SeriesBatch::from_series(&refs).unwrap()
}

fn bench_sdp_naive_vs_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("sdp_naive_vs_fft");
    let m = 100;
    for n in [500, 1_000, 2_000, 5_000, 10_000] {
        let ts: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin()).collect();
        let q: Vec<f64> = ts[0..m].to_vec();
        group.bench_with_input(BenchmarkId::new("naive", n), &n, |b, _| {
            b.iter(|| sliding_dot_product_naive(black_box(&q), black_box(&ts)))
        });
        group.bench_with_input(BenchmarkId::new("fft", n), &n, |b, _| {
            b.iter(|| sliding_dot_product_fft(black_box(&q), black_box(&ts)))
        });
    }
    group.finish();
}

fn bench_moving_mean_stdev(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_mean_stdev");
    for n in [1_000, 5_000, 10_000] {
        let ts: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| moving_mean_stdev(black_box(&ts), 100))
        });
    }
    group.finish();
}

fn bench_mass(c: &mut Criterion) {
    let mut group = c.benchmark_group("mass");
    for n in [1_000, 10_000] {
        let ts: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin()).collect();
        let q: Vec<f64> = ts[100..200].to_vec();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| mass(black_box(&q), black_box(&ts), None))
        });
    }
    group.finish();
}

fn bench_stamp(c: &mut Criterion) {
    let mut group = c.benchmark_group("stamp");
    group.sample_size(10);
    for n in [500, 2_000] {
        let ts: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin()).collect();
        group.bench_with_input(BenchmarkId::new("default", n), &n, |b, _| {
            b.iter(|| stamp_self(black_box(&ts), 50))
        });
        let engine = Engine::<Sequential>::new();
        let config = MatrixProfileConfig::new(50);
        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, _| {
            b.iter(|| engine.stamp_self(black_box(&ts), &config))
        });
    }
    group.finish();
}

fn bench_distance_matrices(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_matrix");
    group.sample_size(10);
    let batch = sine_batch(64, 256);
    group.bench_function("euclidean", |b| b.iter(|| euclidean(black_box(&batch))));
    group.bench_function("manhattan", |b| b.iter(|| manhattan(black_box(&batch))));
    group.bench_function("dtw", |b| b.iter(|| dtw(black_box(&batch))));
    let engine = Engine::<Sequential>::new();
    group.bench_function("dtw_sequential", |b| b.iter(|| engine.dtw(black_box(&batch))));
    group.finish();
}

criterion_group!(
    benches,
    bench_sdp_naive_vs_fft,
    bench_moving_mean_stdev,
    bench_mass,
    bench_stamp,
    bench_distance_matrices,
);
criterion_main!(benches);

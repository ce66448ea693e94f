//! Distribution benchmarks using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispatch_core::test_helpers::{random_pool, test_now, test_ride};
use dispatch_core::{apply_completed_ride, DistributionEngine, DriverId};

fn bench_select_driver(c: &mut Criterion) {
    let engine = DistributionEngine::default();
    let ride = test_ride();
    let now = test_now();

    let mut group = c.benchmark_group("select_driver");
    for size in [5usize, 50, 500, 5_000] {
        let pool = random_pool(42, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            b.iter(|| black_box(engine.select_driver(&ride, black_box(pool), now)))
        });
    }
    group.finish();
}

fn bench_apply_completed_ride(c: &mut Criterion) {
    let now = test_now();
    let pool = random_pool(7, 1_000);
    let driver_id = DriverId::from("driver-00500");

    c.bench_function("apply_completed_ride_1000", |b| {
        b.iter(|| black_box(apply_completed_ride(&driver_id, black_box(&pool), now)))
    });
}

criterion_group!(benches, bench_select_driver, bench_apply_completed_ride);
criterion_main!(benches);

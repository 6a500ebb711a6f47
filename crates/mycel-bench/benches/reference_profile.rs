//! Criterion benchmarks for full ticks on the benchmark profiles.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use mycel_bench::{reference_profile, stress_profile};
use mycel_engine::SimulationStepper;

fn bench_tick_reference(c: &mut Criterion) {
    let mut stepper = SimulationStepper::new(reference_profile(42)).unwrap();

    // Warm up: run one tick so scratch buffers are allocated
    stepper.step().unwrap();

    c.bench_function("tick_256x256_50k", |b| {
        b.iter(|| {
            let metrics = stepper.step().unwrap();
            black_box(metrics.total_us);
        });
    });
}

fn bench_tick_stress(c: &mut Criterion) {
    let mut stepper = SimulationStepper::new(stress_profile(42)).unwrap();
    stepper.step().unwrap();

    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("tick_1024x1024_500k", |b| {
        b.iter(|| {
            let metrics = stepper.step().unwrap();
            black_box(metrics.total_us);
        });
    });
    group.finish();
}

fn bench_single_thread_reference(c: &mut Criterion) {
    let mut config = reference_profile(42);
    config.worker_threads = Some(1);
    let mut stepper = SimulationStepper::new(config).unwrap();
    stepper.step().unwrap();

    c.bench_function("tick_256x256_50k_1thread", |b| {
        b.iter(|| {
            let metrics = stepper.step().unwrap();
            black_box(metrics.total_us);
        });
    });
}

criterion_group!(
    benches,
    bench_tick_reference,
    bench_tick_stress,
    bench_single_thread_reference
);
criterion_main!(benches);

//! Criterion micro-benchmarks for the individual phase kernels.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use mycel_core::SpeciesProfileTable;
use mycel_grid::{FieldGrid, ObstacleMask};
use mycel_kernels::{AgentPhase, BoxBlur, CellKernel, Evaporation};
use mycel_test_utils::{random_agents, trail_profile};

const SIDE: u32 = 256;

fn seeded_field() -> FieldGrid {
    let mut field = FieldGrid::new(SIDE, SIDE, 2).unwrap();
    for (i, v) in field.values_mut().iter_mut().enumerate() {
        *v = (i % 17) as f32 * 0.25;
    }
    field
}

/// Benchmark: sense, steer, move, and deposit for 50K agents.
fn bench_agent_phase_50k(c: &mut Criterion) {
    let species = SpeciesProfileTable::new([trail_profile()]).unwrap();
    let mask = ObstacleMask::all_open(SIDE, SIDE);
    let mut field = FieldGrid::new(SIDE, SIDE, 1).unwrap();
    let mut agents = random_agents(SIDE, SIDE, 50_000, 0, 42);
    let phase = AgentPhase {
        random_turn_factor: 0.01,
        deposit_scale: 1.0,
        obstacles_enabled: false,
    };
    let mut outcomes = Vec::new();

    c.bench_function("agent_phase_50k", |b| {
        b.iter(|| {
            let report = phase.run(
                agents.as_mut_slice(),
                &mut field,
                &mask,
                &species,
                &mut outcomes,
            );
            black_box(report.moved);
        });
    });
}

/// Benchmark: evaporation over a 256x256x2 field.
fn bench_evaporation_256(c: &mut Criterion) {
    let mut field = seeded_field();
    let kernel = Evaporation::new(0.999).unwrap();

    c.bench_function("evaporation_256x256x2", |b| {
        b.iter(|| {
            kernel.apply(&mut field);
            black_box(field.values()[0]);
        });
    });
}

/// Benchmark: one box blur pass at radius 1 and radius 3.
fn bench_box_blur_256(c: &mut Criterion) {
    let mut field = seeded_field();

    for radius in [1, 3] {
        let kernel = BoxBlur::new(radius);
        c.bench_function(&format!("box_blur_r{radius}_256x256x2"), |b| {
            b.iter(|| {
                kernel.apply(&mut field);
                black_box(field.values()[0]);
            });
        });
    }
}

criterion_group!(
    benches,
    bench_agent_phase_50k,
    bench_evaporation_256,
    bench_box_blur_256
);
criterion_main!(benches);

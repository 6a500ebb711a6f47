//! Mycel headless run: a two-species trail simulation without a renderer.
//!
//! Demonstrates:
//!   1. Building a `SimConfig` from per-species arrays (angles in degrees)
//!   2. Stepping a `SimulationStepper` and reading per-tick metrics
//!   3. Reading the settled field through a snapshot
//!   4. Resetting with a new seed
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example headless

use mycel_core::SpeciesArrays;
use mycel_engine::{SimConfig, SimulationStepper};
use mycel_grid::FieldRead;
use tracing_subscriber::EnvFilter;

// ─── Parameters ─────────────────────────────────────────────────

const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;
const TICKS: u32 = 120;

fn species() -> SpeciesArrays {
    SpeciesArrays {
        speeds: vec![1.5, 1.0],
        turn_rates: vec![0.3, 0.5],
        sensor_angles: Vec::new(),
        sensor_distances: vec![9.0, 5.0],
        deposit_amounts: vec![0.5, 0.8],
    }
    .with_sensor_angles_deg(&[30.0, 45.0])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = SimConfig::new(WIDTH, HEIGHT, species(), vec![20_000, 10_000]);
    config.deposit_target_mass = 30_000.0;
    config.evaporation = 0.95;
    config.seed = 7;

    let mut stepper = SimulationStepper::new(config)?;
    println!(
        "{}x{} grid, {} agents, {} workers, deposit scale {:.3}",
        WIDTH,
        HEIGHT,
        stepper.agents().len(),
        stepper.worker_threads(),
        stepper.deposit_scale(),
    );

    for _ in 0..TICKS {
        let metrics = stepper.step()?.clone();
        if stepper.current_tick().0 % 20 == 0 {
            println!(
                "tick {:>4}: {:>6} us  moved {:>6}  clamped {:>5}",
                stepper.current_tick(),
                metrics.total_us,
                metrics.agents_moved,
                metrics.agents_clamped,
            );
        }
    }

    let snap = stepper.snapshot();
    for channel in 0..snap.channels() {
        let peak = snap.channel(channel).fold(0.0f32, f32::max);
        println!(
            "channel {channel}: mass {:.1}, peak {:.3}",
            snap.channel_mass(channel),
            peak
        );
    }

    stepper.reset(8)?;
    println!("reset to tick {}", stepper.current_tick());
    Ok(())
}

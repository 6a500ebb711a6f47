//! Simulation engine for Mycel.
//!
//! Provides [`SimulationStepper`] for caller-driven ticking and
//! [`RealtimeSim`] for ticking on a background thread. Both are built
//! from a [`SimConfig`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod population;
pub mod realtime;
pub mod stepper;

pub use config::{InitError, ObstacleSource, RealtimeConfig, SimConfig};
pub use metrics::StepMetrics;
pub use population::{check_placement, spawn_population};
pub use realtime::{RealtimeSim, StopReport};
pub use stepper::{SimulationStepper, TickPhase};

//! Mycel: a parallel trail-following agent simulation.
//!
//! Agents sense a shared multi-channel field, steer toward their own
//! species' trail, move, and deposit. Each tick the field then evaporates
//! and is blurred. This facade re-exports the public API of the Mycel
//! sub-crates; most users only need this crate.
//!
//! # Quick start
//!
//! ```rust
//! use mycel::prelude::*;
//!
//! let profile = SpeciesProfile {
//!     speed: 1.0,
//!     turn_rate: 0.4,
//!     sensor_angle: 0.5,
//!     sensor_distance: 6.0,
//!     deposit_amount: 1.0,
//! };
//! let mut config = SimConfig::new(64, 64, SpeciesArrays::single(profile), vec![500]);
//! config.worker_threads = Some(2);
//!
//! let mut stepper = SimulationStepper::new(config).unwrap();
//! stepper.step().unwrap();
//!
//! let snapshot = stepper.snapshot();
//! assert_eq!(snapshot.tick_id(), TickId(1));
//! assert!(snapshot.channel_mass(0) > 0.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `mycel-core` | IDs, species table, error enums |
//! | [`grid`] | `mycel-grid` | Field storage, obstacle masks, snapshots |
//! | [`kernels`] | `mycel-kernels` | Agent, evaporation, and blur kernels |
//! | [`engine`] | `mycel-engine` | Configuration, stepper, background driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, species table, and errors (`mycel-core`).
pub use mycel_core as types;

/// Field storage, obstacle masks, and snapshots (`mycel-grid`).
///
/// [`grid::FieldSnapshot`] and [`grid::OwnedFieldSnapshot`] are the
/// renderer-facing views; both implement [`grid::FieldRead`].
pub use mycel_grid as grid;

/// Per-phase kernels (`mycel-kernels`).
///
/// Usually driven by the engine; exposed for custom orchestration and
/// benchmarking.
pub use mycel_kernels as kernels;

/// Simulation engine (`mycel-engine`).
///
/// [`engine::SimulationStepper`] for caller-driven ticking,
/// [`engine::RealtimeSim`] for ticking on a background thread.
pub use mycel_engine as engine;

/// Common imports for typical Mycel usage.
///
/// ```rust
/// use mycel::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mycel_core::{SpeciesArrays, SpeciesId, SpeciesProfile, TickId};

    // Errors
    pub use mycel_core::{AgentError, ConfigError, ResourceError, StepError};

    // Field access
    pub use mycel_grid::{FieldRead, FieldSnapshot, ObstacleMask, OwnedFieldSnapshot};

    // Agents
    pub use mycel_kernels::{Agent, AgentStore};

    // Engine
    pub use mycel_engine::{
        InitError, ObstacleSource, RealtimeConfig, RealtimeSim, SimConfig, SimulationStepper,
        StepMetrics, TickPhase,
    };
}

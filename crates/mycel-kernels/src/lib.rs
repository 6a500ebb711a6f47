//! Per-phase kernels for the Mycel trail simulation.
//!
//! # Tick phases
//!
//! 1. [`AgentPhase`]: one unit of work per agent. Sense the field, steer,
//!    move, then deposit into the agent's species channel.
//! 2. [`Evaporation`]: one unit of work per cell. Multiply every value by
//!    the evaporation factor.
//! 3. [`BoxBlur`]: one unit of work per cell, applied zero or more times.
//!    Replace every value with its clipped square-neighbourhood mean.
//!
//! Kernels are data-parallel over `rayon` and run in whatever pool is
//! current; the caller is responsible for running them in order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod agent_phase;
pub mod decay;
pub mod diffusion;
pub mod kernel;
pub mod movement;
pub mod rng;
pub mod sensing;

pub use agent::{Agent, AgentStore};
pub use agent_phase::{AgentOutcome, AgentPhase, AgentPhaseReport, Deposit};
pub use decay::Evaporation;
pub use diffusion::BoxBlur;
pub use kernel::CellKernel;
pub use movement::{resolve_move, Boundary, MoveOutcome};
pub use sensing::{sense, steer, SensorReading};

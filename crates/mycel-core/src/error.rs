//! Error types for the Mycel trail simulation.
//!
//! Organized by when they can occur: configuration and resource errors are
//! fatal at startup, [`AgentError`] is recovered per agent per tick, and
//! [`StepError`] aborts the run.

use std::error::Error;
use std::fmt;

use crate::id::{SpeciesId, TickId};

/// Structural problems in the parameter set, detected before the first tick.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid width or height is zero.
    ZeroDimension {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// `width * height * channels` does not fit in `u32`.
    CellCountOverflow {
        /// The value that overflowed.
        value: u64,
    },
    /// No species were configured.
    NoSpecies,
    /// A per-species array does not have one entry per species.
    SpeciesArrayLength {
        /// Name of the offending array.
        array: &'static str,
        /// The species count.
        expected: usize,
        /// The array's length.
        actual: usize,
    },
    /// The population split sums to zero agents.
    EmptyPopulation,
    /// Evaporation factor is not strictly inside `(0, 1)`.
    InvalidEvaporation {
        /// The invalid value.
        value: f32,
    },
    /// A numeric parameter is non-finite or outside its allowed range.
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The invalid value.
        value: f32,
        /// Description of the allowed range.
        expected: &'static str,
    },
    /// `worker_threads` was set to zero.
    ZeroWorkers,
    /// A supplied agent has a NaN or infinite heading.
    NonFiniteHeading {
        /// Index of the agent in the store.
        agent: usize,
        /// The invalid heading.
        value: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { width, height } => {
                write!(f, "grid dimensions must be positive, got {width}x{height}")
            }
            Self::CellCountOverflow { value } => {
                write!(f, "field storage of {value} slots exceeds u32::MAX")
            }
            Self::NoSpecies => write!(f, "at least one species is required"),
            Self::SpeciesArrayLength {
                array,
                expected,
                actual,
            } => write!(
                f,
                "species array '{array}' has {actual} entries, expected {expected}"
            ),
            Self::EmptyPopulation => write!(f, "population split contains no agents"),
            Self::InvalidEvaporation { value } => {
                write!(f, "evaporation factor must be in (0, 1), got {value}")
            }
            Self::InvalidParameter {
                name,
                value,
                expected,
            } => write!(f, "parameter '{name}' must be {expected}, got {value}"),
            Self::ZeroWorkers => write!(f, "worker_threads must be at least 1"),
            Self::NonFiniteHeading { agent, value } => {
                write!(f, "agent {agent} has non-finite heading {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Failures acquiring the obstacle source, detected before the first tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceError {
    /// The obstacle image could not be opened or decoded.
    ObstacleUnreadable {
        /// Path that was read.
        path: String,
        /// Decoder or I/O message.
        reason: String,
    },
    /// The obstacle source does not have the grid's extent.
    ObstacleExtentMismatch {
        /// Grid `(width, height)`.
        expected: (u32, u32),
        /// Obstacle source `(width, height)`.
        actual: (u32, u32),
    },
    /// An in-memory mask has the wrong number of cells for its extent.
    ObstacleCellCount {
        /// `width * height`.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
    /// The obstacle source blocks every cell, so no agent can be placed.
    NoOpenCells,
    /// A supplied agent's position is non-finite or outside the grid.
    AgentOffGrid {
        /// Index of the agent in the store.
        agent: usize,
    },
    /// A supplied agent starts on a blocked cell.
    AgentOnObstacle {
        /// Index of the agent in the store.
        agent: usize,
        /// The blocked cell `(x, y)`.
        cell: (u32, u32),
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObstacleUnreadable { path, reason } => {
                write!(f, "obstacle source '{path}' unreadable: {reason}")
            }
            Self::ObstacleExtentMismatch { expected, actual } => write!(
                f,
                "obstacle source is {}x{}, grid is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::ObstacleCellCount { expected, actual } => {
                write!(f, "obstacle mask needs {expected} cells, got {actual}")
            }
            Self::NoOpenCells => write!(f, "obstacle source has no open cells"),
            Self::AgentOffGrid { agent } => {
                write!(f, "agent {agent} is not inside the grid")
            }
            Self::AgentOnObstacle { agent, cell } => write!(
                f,
                "agent {agent} starts on blocked cell ({}, {})",
                cell.0, cell.1
            ),
        }
    }
}

impl Error for ResourceError {}

/// A per-agent failure during the agent phase.
///
/// Recovered locally: the agent's update is skipped for the current tick
/// and the run continues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentError {
    /// The agent's species index has no entry in the species table.
    UnknownSpecies {
        /// Position of the agent in the store.
        agent: usize,
        /// The unresolved species id.
        species: SpeciesId,
    },
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSpecies { agent, species } => {
                write!(f, "agent {agent} has unknown species {species}")
            }
        }
    }
}

impl Error for AgentError {}

/// Fatal errors from a simulation tick.
///
/// A tick that fails is never retried or rolled back; the run is aborted.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A non-finite value appeared in the field after a tick.
    NonFiniteField {
        /// Tick that produced the value.
        tick: TickId,
        /// Channel containing the value.
        channel: usize,
        /// Row-major cell index of the first offending cell.
        cell: usize,
    },
    /// The run was aborted by an earlier fatal error.
    Aborted,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteField {
                tick,
                channel,
                cell,
            } => write!(
                f,
                "non-finite value in channel {channel} at cell {cell} after tick {tick}"
            ),
            Self::Aborted => write!(f, "run aborted by an earlier fatal error"),
        }
    }
}

impl Error for StepError {}

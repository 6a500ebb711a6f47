//! Simulation configuration, validation, and startup errors.
//!
//! [`SimConfig`] is the complete parameter set for one run. It is built by
//! the caller, checked once by [`validate()`](SimConfig::validate), and
//! consumed by [`SimulationStepper::new`](crate::SimulationStepper::new).
//! Nothing is allocated until validation has passed.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use mycel_core::{ConfigError, ResourceError, SpeciesArrays, SpeciesProfileTable};
use mycel_grid::ObstacleMask;

// ── ObstacleSource ────────────────────────────────────────────────

/// Where the obstacle mask comes from.
#[derive(Clone, Debug, Default)]
pub enum ObstacleSource {
    /// Obstacles disabled; agents are clamped at the grid edge.
    #[default]
    Disabled,
    /// An in-memory mask. Must match the grid extent.
    Mask(ObstacleMask),
    /// An image file decoded to luma; dark pixels are blocked.
    Image(PathBuf),
}

impl ObstacleSource {
    /// Whether obstacles are enabled at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Load the mask for a `width × height` grid.
    ///
    /// `Disabled` yields an all-open mask. Enabled sources must match the
    /// grid extent and leave at least one cell open.
    pub fn load(&self, width: u32, height: u32) -> Result<ObstacleMask, ResourceError> {
        let mask = match self {
            Self::Disabled => return Ok(ObstacleMask::all_open(width, height)),
            Self::Mask(mask) => mask.clone(),
            Self::Image(path) => ObstacleMask::from_image_path(path)?,
        };
        mask.ensure_extent(width, height)?;
        if mask.open_count() == 0 {
            return Err(ResourceError::NoOpenCells);
        }
        Ok(mask)
    }
}

// ── RealtimeConfig ────────────────────────────────────────────────

/// Configuration for [`RealtimeSim`](crate::RealtimeSim).
#[derive(Clone, Debug)]
pub struct RealtimeConfig {
    /// Target ticks per second. `None` = tick as fast as possible.
    /// Default: 60.
    pub tick_rate_hz: Option<f64>,
    /// Capacity of the snapshot channel. Snapshots are dropped while it
    /// is full. Default: 4. Minimum: 1.
    pub snapshot_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: Some(60.0),
            snapshot_capacity: 4,
        }
    }
}

impl RealtimeConfig {
    /// Check the tick rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(hz) = self.tick_rate_hz {
            // Reciprocal must be finite for Duration::from_secs_f64.
            if !hz.is_finite() || hz <= 0.0 || !(1.0 / hz).is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name: "tick_rate_hz",
                    value: hz as f32,
                    expected: "finite and positive",
                });
            }
        }
        Ok(())
    }
}

// ── InitError ─────────────────────────────────────────────────────

/// Errors that prevent a simulation from starting.
#[derive(Clone, Debug, PartialEq)]
pub enum InitError {
    /// The parameter set is invalid.
    Config(ConfigError),
    /// The obstacle source could not be used.
    Resource(ResourceError),
    /// The worker pool or driver thread could not be created.
    ThreadPool {
        /// Description from the failing builder.
        reason: String,
    },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Resource(e) => write!(f, "resource: {e}"),
            Self::ThreadPool { reason } => write!(f, "thread pool: {reason}"),
        }
    }
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Resource(e) => Some(e),
            Self::ThreadPool { .. } => None,
        }
    }
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ResourceError> for InitError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────

/// Complete parameter set for one simulation run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Grid width, in cells.
    pub width: u32,
    /// Grid height, in cells.
    pub height: u32,
    /// Number of species. Every per-species array must have this length.
    pub species_count: usize,
    /// Per-species behaviour constants as parallel arrays.
    pub species: SpeciesArrays,
    /// Agents spawned per species.
    pub population: Vec<usize>,
    /// Per-tick multiplier applied to every field value. Default: 0.92.
    pub evaporation: f32,
    /// Half-width of the blur window. 0 disables blurring. Default: 1.
    pub blur_radius: u32,
    /// Blur passes per tick. Default: 1.
    pub blur_passes: u32,
    /// Amplitude of the random heading wiggle, in radians. Default: 0.01.
    pub random_turn_factor: f32,
    /// Total deposit per tick across the population, before each
    /// species' deposit amount. Default: 250 000.
    pub deposit_target_mass: f32,
    /// Obstacle source. Default: disabled.
    pub obstacles: ObstacleSource,
    /// Give each agent its own generator state. When false every agent
    /// wiggles identically. Default: true.
    pub random_seeds: bool,
    /// Master seed for population spawn. Default: 0.
    pub seed: u64,
    /// Size of the worker pool. `None` = one thread per core.
    pub worker_threads: Option<usize>,
    /// Scan the field for NaN or infinity after every tick and abort the
    /// run if any is found. Default: false.
    pub nan_check: bool,
}

impl SimConfig {
    /// Configuration for a `width × height` grid with the given species
    /// and population split. Everything else takes its default.
    pub fn new(
        width: u32,
        height: u32,
        species: SpeciesArrays,
        population: Vec<usize>,
    ) -> Self {
        Self {
            width,
            height,
            species_count: population.len(),
            species,
            population,
            evaporation: 0.92,
            blur_radius: 1,
            blur_passes: 1,
            random_turn_factor: 0.01,
            deposit_target_mass: 250_000.0,
            obstacles: ObstacleSource::Disabled,
            random_seeds: true,
            seed: 0,
            worker_threads: None,
            nan_check: false,
        }
    }

    /// Total number of agents across species.
    pub fn total_agents(&self) -> usize {
        self.population.iter().sum()
    }

    /// Validate every structural invariant.
    ///
    /// Does not touch the obstacle source; that is checked when the
    /// stepper loads it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid must be non-empty.
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        // 2. Species table must be complete and well-formed.
        self.species_table()?;
        // 3. Field storage must be addressable with u32.
        let slots = u64::from(self.width) * u64::from(self.height) * self.species_count as u64;
        if u32::try_from(slots).is_err() {
            return Err(ConfigError::CellCountOverflow { value: slots });
        }
        // 4. One population entry per species, and at least one agent.
        if self.population.len() != self.species_count {
            return Err(ConfigError::SpeciesArrayLength {
                array: "population",
                expected: self.species_count,
                actual: self.population.len(),
            });
        }
        if self.total_agents() == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        // 5. Scalar parameters.
        if !(self.evaporation > 0.0 && self.evaporation < 1.0) {
            return Err(ConfigError::InvalidEvaporation {
                value: self.evaporation,
            });
        }
        non_negative("random_turn_factor", self.random_turn_factor)?;
        non_negative("deposit_target_mass", self.deposit_target_mass)?;
        // 6. Worker pool.
        if self.worker_threads == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }

    /// Build the species table from the per-species arrays.
    pub fn species_table(&self) -> Result<SpeciesProfileTable, ConfigError> {
        SpeciesProfileTable::from_arrays(self.species_count, &self.species)
    }

    /// Worker count the stepper's pool will be built with.
    pub fn resolved_worker_threads(&self) -> usize {
        match self.worker_threads {
            Some(n) => n.max(1),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            expected: "finite and non-negative",
        })
    }
}

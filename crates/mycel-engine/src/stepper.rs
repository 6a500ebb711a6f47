//! The tick state machine.
//!
//! [`SimulationStepper`] owns the field, the agents, the read-only tables,
//! and a dedicated rayon pool. Each tick runs three phases in a fixed
//! order:
//!
//! 1. **AgentDeposit**: every agent senses, steers, moves, and deposits.
//! 2. **Decay**: every field value is multiplied by the evaporation factor.
//! 3. **Diffuse**: the box blur runs `blur_passes` times.
//!
//! Each phase runs to completion inside the pool before the next begins,
//! so later phases always observe every write of earlier ones. Callers
//! only ever see the field between ticks (the `Settled` state); a tick
//! either completes or aborts the run.

use std::time::Instant;

use mycel_core::{ResourceError, SpeciesProfileTable, StepError, TickId};
use mycel_grid::{FieldGrid, FieldSnapshot, ObstacleMask, OwnedFieldSnapshot};
use mycel_kernels::{
    AgentOutcome, AgentPhase, AgentPhaseReport, AgentStore, BoxBlur, CellKernel, Evaporation,
};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, info, warn};

use crate::config::{InitError, SimConfig};
use crate::metrics::StepMetrics;
use crate::population::{check_placement, spawn_population};

/// Position of the stepper in the tick cycle.
///
/// Each variant names the phase that most recently completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPhase {
    /// Agents have moved and deposited.
    AgentDeposit,
    /// Evaporation has run.
    Decay,
    /// The given blur pass (1-based) has run and its buffers swapped.
    Diffuse {
        /// Number of passes completed this tick.
        pass: u32,
    },
    /// The tick is complete. The field is safe to read.
    Settled,
    /// A fatal error ended the run. Only [`SimulationStepper::reset`]
    /// leaves this state.
    Aborted,
}

/// How the population is rebuilt on reset.
#[derive(Clone, Debug)]
enum Origin {
    Spawned,
    Supplied(AgentStore),
}

/// Caller-driven simulation.
///
/// Construct with [`new`](Self::new), call [`step`](Self::step) once per
/// tick, and read the result through [`snapshot`](Self::snapshot).
pub struct SimulationStepper {
    config: SimConfig,
    origin: Origin,
    species: SpeciesProfileTable,
    obstacles: ObstacleMask,
    agents: AgentStore,
    field: FieldGrid,
    agent_phase: AgentPhase,
    evaporation: Evaporation,
    blur: BoxBlur,
    pool: ThreadPool,
    phase: TickPhase,
    tick: TickId,
    outcomes: Vec<AgentOutcome>,
    pending: StepMetrics,
    tick_start: Option<Instant>,
    last_metrics: StepMetrics,
}

impl SimulationStepper {
    /// Validate `config`, load obstacles, spawn the population, and build
    /// the worker pool. The field starts at zero in the `Settled` state at
    /// tick 0.
    pub fn new(config: SimConfig) -> Result<Self, InitError> {
        config.validate()?;
        let obstacles = config.obstacles.load(config.width, config.height)?;
        let agents = spawn_population(
            &config.population,
            &obstacles,
            config.seed,
            config.random_seeds,
        )?;
        Self::build(config, obstacles, agents, Origin::Spawned)
    }

    /// Like [`new`](Self::new), but with an explicit set of agents instead
    /// of a spawned population.
    ///
    /// `config.population` must still be valid but is otherwise ignored.
    /// Positions and headings are checked with [`check_placement`].
    /// Agents are not checked against the species table; agents of an
    /// unknown species are skipped every tick.
    pub fn with_agents(config: SimConfig, agents: AgentStore) -> Result<Self, InitError> {
        config.validate()?;
        let obstacles = config.obstacles.load(config.width, config.height)?;
        check_placement(&agents, &obstacles)?;
        Self::build(config, obstacles, agents.clone(), Origin::Supplied(agents))
    }

    fn build(
        config: SimConfig,
        obstacles: ObstacleMask,
        agents: AgentStore,
        origin: Origin,
    ) -> Result<Self, InitError> {
        let species = config.species_table()?;
        let field = FieldGrid::new(config.width, config.height, species.len())?;
        let evaporation = Evaporation::new(config.evaporation)?;
        let blur = BoxBlur::new(config.blur_radius);
        let agent_phase = AgentPhase {
            random_turn_factor: config.random_turn_factor,
            deposit_scale: AgentPhase::deposit_scale_for(config.deposit_target_mass, agents.len()),
            obstacles_enabled: config.obstacles.is_enabled(),
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.resolved_worker_threads())
            .thread_name(|i| format!("mycel-worker-{i}"))
            .build()
            .map_err(|e| InitError::ThreadPool {
                reason: e.to_string(),
            })?;

        info!(
            width = config.width,
            height = config.height,
            species = species.len(),
            agents = agents.len(),
            workers = pool.current_num_threads(),
            obstacles = agent_phase.obstacles_enabled,
            deposit_scale = agent_phase.deposit_scale,
            "simulation stepper created"
        );

        Ok(Self {
            outcomes: Vec::with_capacity(agents.len()),
            config,
            origin,
            species,
            obstacles,
            agents,
            field,
            agent_phase,
            evaporation,
            blur,
            pool,
            phase: TickPhase::Settled,
            tick: TickId::default(),
            pending: StepMetrics::default(),
            tick_start: None,
            last_metrics: StepMetrics::default(),
        })
    }

    // ── Ticking ───────────────────────────────────────────────────

    /// Run one complete tick and return its metrics.
    ///
    /// # Errors
    ///
    /// [`StepError::NonFiniteField`] if NaN checking is enabled and the
    /// tick produced a non-finite value; the run is aborted.
    /// [`StepError::Aborted`] on every call after an abort.
    pub fn step(&mut self) -> Result<&StepMetrics, StepError> {
        loop {
            if self.advance_phase()? == TickPhase::Settled {
                return Ok(&self.last_metrics);
            }
        }
    }

    /// Run the next phase of the current tick (starting a new tick from
    /// `Settled`) and return the state reached.
    pub(crate) fn advance_phase(&mut self) -> Result<TickPhase, StepError> {
        let next = match self.phase {
            TickPhase::Aborted => return Err(StepError::Aborted),
            TickPhase::Settled => {
                self.begin_tick();
                self.run_agent_phase();
                TickPhase::AgentDeposit
            }
            TickPhase::AgentDeposit => {
                self.pending.decay_us = self.run_cell_kernel(CellKernelKind::Evaporation);
                TickPhase::Decay
            }
            TickPhase::Decay => self.diffuse_or_settle(0)?,
            TickPhase::Diffuse { pass } => self.diffuse_or_settle(pass)?,
        };
        self.phase = next;
        Ok(next)
    }

    fn begin_tick(&mut self) {
        self.pending = StepMetrics::default();
        self.tick_start = Some(Instant::now());
    }

    fn run_agent_phase(&mut self) {
        let start = Instant::now();
        let Self {
            pool,
            agent_phase,
            agents,
            field,
            obstacles,
            species,
            outcomes,
            ..
        } = self;
        let report: AgentPhaseReport = pool.install(|| {
            agent_phase.run(agents.as_mut_slice(), field, obstacles, species, outcomes)
        });
        self.pending.agent_us = start.elapsed().as_micros() as u64;
        self.record_agent_report(report);
    }

    fn record_agent_report(&mut self, report: AgentPhaseReport) {
        if let Some(first) = report.first_skip {
            warn!(
                tick = self.tick.next().0,
                skipped = report.skipped,
                first = %first,
                "agents skipped for unknown species"
            );
        }
        self.pending.agents_moved = report.moved;
        self.pending.agents_rejected = report.rejected;
        self.pending.agents_clamped = report.clamped;
        self.pending.agents_skipped = report.skipped;
        self.pending.deposited = report.deposited;
    }

    fn diffuse_or_settle(&mut self, done: u32) -> Result<TickPhase, StepError> {
        if done < self.config.blur_passes {
            self.pending.diffuse_us += self.run_cell_kernel(CellKernelKind::Blur);
            if self.blur.radius() > 0 {
                self.pending.blur_passes += 1;
            }
            Ok(TickPhase::Diffuse { pass: done + 1 })
        } else {
            self.settle()?;
            Ok(TickPhase::Settled)
        }
    }

    fn run_cell_kernel(&mut self, kind: CellKernelKind) -> u64 {
        let start = Instant::now();
        let kernel: &dyn CellKernel = match kind {
            CellKernelKind::Evaporation => &self.evaporation,
            CellKernelKind::Blur => &self.blur,
        };
        let field = &mut self.field;
        self.pool.install(|| kernel.apply(field));
        start.elapsed().as_micros() as u64
    }

    fn settle(&mut self) -> Result<(), StepError> {
        let tick = self.tick.next();
        if self.config.nan_check {
            if let Some((cell, channel)) = self.field.first_non_finite() {
                self.phase = TickPhase::Aborted;
                error!(tick = tick.0, cell, channel, "non-finite field value; run aborted");
                return Err(StepError::NonFiniteField {
                    tick,
                    channel,
                    cell,
                });
            }
        }
        self.tick = tick;
        self.pending.total_us = self
            .tick_start
            .take()
            .map(|t| t.elapsed().as_micros() as u64)
            .unwrap_or(0);
        self.last_metrics = std::mem::take(&mut self.pending);
        let m = &self.last_metrics;
        debug!(
            tick = tick.0,
            total_us = m.total_us,
            agent_us = m.agent_us,
            decay_us = m.decay_us,
            diffuse_us = m.diffuse_us,
            blur_passes = m.blur_passes,
            deposited = m.total_deposited(),
            "tick settled"
        );
        Ok(())
    }

    // ── Reset ─────────────────────────────────────────────────────

    /// Zero the field, rebuild the population from `seed`, and return to
    /// tick 0 in the `Settled` state. Clears an abort.
    ///
    /// A stepper built with [`with_agents`](Self::with_agents) restores
    /// its original agents; `seed` is recorded but not used for them.
    pub fn reset(&mut self, seed: u64) -> Result<(), ResourceError> {
        self.agents = match &self.origin {
            Origin::Spawned => spawn_population(
                &self.config.population,
                &self.obstacles,
                seed,
                self.config.random_seeds,
            )?,
            Origin::Supplied(agents) => agents.clone(),
        };
        self.config.seed = seed;
        self.field.clear();
        self.phase = TickPhase::Settled;
        self.tick = TickId::default();
        self.pending = StepMetrics::default();
        self.tick_start = None;
        self.last_metrics = StepMetrics::default();
        info!(seed, agents = self.agents.len(), "simulation reset");
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────

    /// Read-only view of the field as of the last settled tick.
    pub fn snapshot(&self) -> FieldSnapshot<'_> {
        FieldSnapshot::new(self.tick, &self.field)
    }

    /// Thread-shareable copy of the field as of the last settled tick.
    pub fn owned_snapshot(&self) -> OwnedFieldSnapshot {
        self.snapshot().to_owned_snapshot()
    }

    /// Number of ticks completed since construction or the last reset.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    /// Current state. Always `Settled` or `Aborted` between public calls.
    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    /// Whether a fatal error has ended the run.
    pub fn is_aborted(&self) -> bool {
        self.phase == TickPhase::Aborted
    }

    /// The agents, in storage order.
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    /// The species table.
    pub fn species(&self) -> &SpeciesProfileTable {
        &self.species
    }

    /// The obstacle mask (all open when obstacles are disabled).
    pub fn obstacles(&self) -> &ObstacleMask {
        &self.obstacles
    }

    /// The configuration this stepper was built from.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Multiplier applied to every deposit.
    pub fn deposit_scale(&self) -> f32 {
        self.agent_phase.deposit_scale
    }

    /// Threads in the worker pool.
    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Metrics from the most recently settled tick.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut FieldGrid {
        &mut self.field
    }
}

impl std::fmt::Debug for SimulationStepper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationStepper")
            .field("width", &self.field.width())
            .field("height", &self.field.height())
            .field("species", &self.species.len())
            .field("agents", &self.agents.len())
            .field("tick", &self.tick)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy)]
enum CellKernelKind {
    Evaporation,
    Blur,
}

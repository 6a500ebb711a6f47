//! Phase (a): sense, steer, move, deposit.
//!
//! Every agent is updated in parallel against the field as it stood when
//! the phase began. Updates never touch the field directly; each produces
//! an [`AgentOutcome`], and once all agents are done the deposits are
//! added to the field sequentially in agent order. Concurrent agents in
//! the same cell therefore accumulate rather than overwrite, and the sum
//! is identical from run to run regardless of thread count.

use std::f32::consts::TAU;

use mycel_core::{AgentError, SpeciesId, SpeciesProfileTable};
use mycel_grid::{FieldGrid, ObstacleMask};
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::agent::Agent;
use crate::movement::{resolve_move, Boundary, MoveOutcome};
use crate::rng::next_unit;
use crate::sensing::{sense, steer};

/// A single deposit produced by one agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deposit {
    /// Row-major cell index.
    pub cell: usize,
    /// Field channel (the agent's species).
    pub channel: usize,
    /// Amount to add.
    pub amount: f32,
}

/// Result of updating one agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AgentOutcome {
    /// The agent's species has no profile; it was left untouched.
    Skipped(AgentError),
    /// The agent was updated.
    Updated {
        /// Boundary outcome of the move.
        movement: MoveOutcome,
        /// Deposit at the post-move cell, if the position is on the grid.
        deposit: Option<Deposit>,
    },
}

/// Aggregate counters for one agent phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentPhaseReport {
    /// Agents that moved to their proposed position.
    pub moved: usize,
    /// Agents whose move was refused by an obstacle or the grid edge.
    pub rejected: usize,
    /// Agents clamped back onto the grid.
    pub clamped: usize,
    /// Agents skipped because their species is unknown.
    pub skipped: usize,
    /// First skip encountered, in agent order.
    pub first_skip: Option<AgentError>,
    /// Mass deposited per channel this phase.
    pub deposited: SmallVec<[f64; 4]>,
}

impl AgentPhaseReport {
    fn new(channels: usize) -> Self {
        Self {
            deposited: SmallVec::from_elem(0.0, channels),
            ..Self::default()
        }
    }

    /// Total mass deposited across channels.
    pub fn total_deposited(&self) -> f64 {
        self.deposited.iter().sum()
    }
}

/// Parameters of the agent phase that are fixed for a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPhase {
    /// Amplitude of the random heading wiggle, in radians.
    pub random_turn_factor: f32,
    /// Multiplier applied to every species' deposit amount.
    pub deposit_scale: f32,
    /// Use the obstacle mask for boundaries instead of clamping.
    pub obstacles_enabled: bool,
}

impl AgentPhase {
    /// Deposit scale that keeps the total deposit per tick equal to
    /// `target_mass` (times the species' deposit amount) for any
    /// population size.
    pub fn deposit_scale_for(target_mass: f32, population: usize) -> f32 {
        if population == 0 {
            0.0
        } else {
            target_mass / population as f32
        }
    }

    /// Run the phase over `agents`, then apply all deposits to `field`.
    ///
    /// `outcomes` is scratch storage reused across ticks; its contents on
    /// return are the per-agent outcomes in agent order.
    pub fn run(
        &self,
        agents: &mut [Agent],
        field: &mut FieldGrid,
        mask: &ObstacleMask,
        species: &SpeciesProfileTable,
        outcomes: &mut Vec<AgentOutcome>,
    ) -> AgentPhaseReport {
        {
            let snapshot: &FieldGrid = field;
            let boundary = if self.obstacles_enabled {
                Boundary::Obstacles(mask)
            } else {
                Boundary::Clamp {
                    width: snapshot.width() as f32,
                    height: snapshot.height() as f32,
                }
            };
            agents
                .par_iter_mut()
                .enumerate()
                .map(|(index, agent)| self.update_agent(index, agent, snapshot, boundary, species))
                .collect_into_vec(outcomes);
        }

        let mut report = AgentPhaseReport::new(field.channels());
        for outcome in outcomes.iter() {
            match *outcome {
                AgentOutcome::Skipped(err) => {
                    report.skipped += 1;
                    report.first_skip.get_or_insert(err);
                }
                AgentOutcome::Updated { movement, deposit } => {
                    match movement {
                        MoveOutcome::Moved => report.moved += 1,
                        MoveOutcome::Rejected => report.rejected += 1,
                        MoveOutcome::Clamped => report.clamped += 1,
                    }
                    if let Some(d) = deposit {
                        field.add(d.cell, d.channel, d.amount);
                        if let Some(total) = report.deposited.get_mut(d.channel) {
                            *total += f64::from(d.amount);
                        }
                    }
                }
            }
        }
        report
    }

    /// Update one agent against a read-only view of the field.
    pub fn update_agent(
        &self,
        index: usize,
        agent: &mut Agent,
        field: &FieldGrid,
        boundary: Boundary<'_>,
        species: &SpeciesProfileTable,
    ) -> AgentOutcome {
        let id: SpeciesId = agent.species;
        let Some(profile) = species.get(id) else {
            return AgentOutcome::Skipped(AgentError::UnknownSpecies {
                agent: index,
                species: id,
            });
        };
        let channel = id.index();

        let reading = sense(field, agent.x, agent.y, agent.heading, profile, channel);
        let steered = steer(agent.heading, reading, profile.turn_rate);
        let wiggle = (next_unit(&mut agent.rng_state) - 0.5) * self.random_turn_factor;
        agent.heading = steered + wiggle;

        let nx = agent.x + agent.heading.cos() * profile.speed;
        let ny = agent.y + agent.heading.sin() * profile.speed;
        let movement = resolve_move(agent, nx, ny, boundary);
        agent.heading = normalize_heading(agent.heading);

        let deposit = field.cell_at(agent.x, agent.y).map(|cell| Deposit {
            cell,
            channel,
            amount: profile.deposit_amount * self.deposit_scale,
        });
        AgentOutcome::Updated { movement, deposit }
    }
}

/// Wrap `heading` into `[0, 2π)`.
fn normalize_heading(heading: f32) -> f32 {
    let wrapped = heading.rem_euclid(TAU);
    // Tiny negative inputs round up to exactly 2π.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

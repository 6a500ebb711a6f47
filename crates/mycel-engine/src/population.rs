//! Initial agent placement.
//!
//! Agents are created species by species, in species order, using one
//! master ChaCha8 generator seeded from the run seed. The same seed and
//! configuration always produce the same population.

use std::f32::consts::TAU;

use mycel_core::{ConfigError, ResourceError, SpeciesId};
use mycel_grid::ObstacleMask;
use mycel_kernels::rng::FIXED_AGENT_STATE;
use mycel_kernels::{Agent, AgentStore};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::InitError;

/// Uniform re-draws before falling back to a scan for an open cell.
const PLACEMENT_ATTEMPTS: usize = 32;

/// Spawn the population described by `population` onto `mask`.
///
/// `population[s]` agents of species `s` are created with uniform
/// positions and headings. Positions on blocked cells are re-drawn; after
/// [`PLACEMENT_ATTEMPTS`] misses the agent is put in the centre of the
/// first open cell at or after a random start. With `random_seeds` false
/// every agent receives the same generator state.
///
/// # Errors
///
/// [`ResourceError::NoOpenCells`] if the mask has no open cell.
pub fn spawn_population(
    population: &[usize],
    mask: &ObstacleMask,
    seed: u64,
    random_seeds: bool,
) -> Result<AgentStore, ResourceError> {
    if mask.open_count() == 0 {
        return Err(ResourceError::NoOpenCells);
    }
    let width = mask.width() as f32;
    let height = mask.height() as f32;
    let cells = mask.width() as usize * mask.height() as usize;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut agents = Vec::with_capacity(population.iter().sum());

    for (species, &count) in population.iter().enumerate() {
        let id = SpeciesId(species as u32);
        for _ in 0..count {
            let (x, y) = place(&mut rng, mask, width, height, cells)?;
            let heading = rng.random_range(0.0..TAU);
            let state = if random_seeds {
                rng.next_u64()
            } else {
                FIXED_AGENT_STATE
            };
            agents.push(Agent::new(x, y, heading, id, state));
        }
    }
    Ok(AgentStore::from_agents(agents))
}

fn place(
    rng: &mut ChaCha8Rng,
    mask: &ObstacleMask,
    width: f32,
    height: f32,
    cells: usize,
) -> Result<(f32, f32), ResourceError> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let x = rng.random_range(0.0..width);
        let y = rng.random_range(0.0..height);
        if !mask.blocks(x, y) {
            return Ok((x, y));
        }
    }
    let start = rng.random_range(0..cells);
    let cell = mask
        .next_open_cell(start)
        .ok_or(ResourceError::NoOpenCells)?;
    let row = mask.width() as usize;
    Ok(((cell % row) as f32 + 0.5, (cell / row) as f32 + 0.5))
}

/// Check a caller-supplied population against the grid and `mask`.
///
/// Every agent must have a finite heading and sit inside
/// `[0, width) × [0, height)` on an open cell. Species ids are not checked.
///
/// # Errors
///
/// - [`ConfigError::NonFiniteHeading`] for a NaN or infinite heading.
/// - [`ResourceError::AgentOffGrid`] for a non-finite or out-of-range position.
/// - [`ResourceError::AgentOnObstacle`] for an agent on a blocked cell.
pub fn check_placement(agents: &AgentStore, mask: &ObstacleMask) -> Result<(), InitError> {
    let width = mask.width() as f32;
    let height = mask.height() as f32;
    for (agent, a) in agents.iter().enumerate() {
        if !a.heading.is_finite() {
            return Err(ConfigError::NonFiniteHeading {
                agent,
                value: a.heading,
            }
            .into());
        }
        // Also false for NaN.
        let inside = a.x >= 0.0 && a.y >= 0.0 && a.x < width && a.y < height;
        if !inside {
            return Err(ResourceError::AgentOffGrid { agent }.into());
        }
        let cell = (a.x as u32, a.y as u32);
        if mask.is_blocked(cell.0, cell.1) {
            return Err(ResourceError::AgentOnObstacle { agent, cell }.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_follows_population() {
        let mask = ObstacleMask::all_open(16, 16);
        let store = spawn_population(&[3, 5], &mask, 7, true).unwrap();
        assert_eq!(store.len(), 8);
        assert_eq!(store.species_counts(2).as_slice(), &[3, 5]);
        // Species order is preserved.
        assert!(store.as_slice()[..3].iter().all(|a| a.species == SpeciesId(0)));
        assert!(store.as_slice()[3..].iter().all(|a| a.species == SpeciesId(1)));
    }

    #[test]
    fn positions_and_headings_in_range() {
        let mask = ObstacleMask::all_open(10, 6);
        let store = spawn_population(&[500], &mask, 1, true).unwrap();
        for a in &store {
            assert!(a.x >= 0.0 && a.x < 10.0);
            assert!(a.y >= 0.0 && a.y < 6.0);
            assert!(a.heading >= 0.0 && a.heading < TAU);
        }
    }

    #[test]
    fn same_seed_same_population() {
        let mask = ObstacleMask::all_open(32, 32);
        let a = spawn_population(&[50, 50], &mask, 99, true).unwrap();
        let b = spawn_population(&[50, 50], &mask, 99, true).unwrap();
        let c = spawn_population(&[50, 50], &mask, 100, true).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fixed_states_without_random_seeds() {
        let mask = ObstacleMask::all_open(8, 8);
        let store = spawn_population(&[20], &mask, 3, false).unwrap();
        assert!(store.iter().all(|a| a.rng_state == FIXED_AGENT_STATE));
    }

    #[test]
    fn blocked_cells_avoided() {
        // Only the bottom-right cell is open.
        let mut cells = vec![true; 64];
        cells[63] = false;
        let mask = ObstacleMask::from_cells(8, 8, cells).unwrap();
        let store = spawn_population(&[40], &mask, 5, true).unwrap();
        for a in &store {
            assert!(!mask.blocks(a.x, a.y), "agent at ({}, {})", a.x, a.y);
        }
    }

    #[test]
    fn fully_blocked_mask_fails() {
        let mask = ObstacleMask::from_cells(2, 2, vec![true; 4]).unwrap();
        assert_eq!(
            spawn_population(&[1], &mask, 0, true),
            Err(ResourceError::NoOpenCells)
        );
    }

    #[test]
    fn spawned_population_passes_placement_check() {
        let mut cells = vec![false; 64];
        cells[..32].fill(true);
        let mask = ObstacleMask::from_cells(8, 8, cells).unwrap();
        let store = spawn_population(&[30, 30], &mask, 12, true).unwrap();
        assert!(check_placement(&store, &mask).is_ok());
    }

    #[test]
    fn placement_rejects_bad_positions() {
        let mask = ObstacleMask::all_open(8, 8);
        for (x, y) in [(f32::NAN, 4.0), (4.0, f32::INFINITY), (-3.0, 4.0), (8.0, 4.0), (4.0, 8.5)] {
            let store = AgentStore::from_agents(vec![
                Agent::new(1.0, 1.0, 0.0, SpeciesId(0), 0),
                Agent::new(x, y, 0.0, SpeciesId(0), 0),
            ]);
            assert!(
                matches!(
                    check_placement(&store, &mask),
                    Err(InitError::Resource(ResourceError::AgentOffGrid { agent: 1 }))
                ),
                "({x}, {y}) accepted"
            );
        }
    }

    #[test]
    fn placement_rejects_non_finite_heading() {
        let mask = ObstacleMask::all_open(8, 8);
        let store = AgentStore::from_agents(vec![Agent::new(2.0, 2.0, f32::NAN, SpeciesId(0), 0)]);
        assert!(matches!(
            check_placement(&store, &mask),
            Err(InitError::Config(ConfigError::NonFiniteHeading { agent: 0, .. }))
        ));
    }

    #[test]
    fn placement_rejects_blocked_cell() {
        let mut cells = vec![false; 16];
        cells[2 * 4 + 1] = true;
        let mask = ObstacleMask::from_cells(4, 4, cells).unwrap();
        let store = AgentStore::from_agents(vec![Agent::new(1.5, 2.5, 0.0, SpeciesId(0), 0)]);
        assert!(matches!(
            check_placement(&store, &mask),
            Err(InitError::Resource(ResourceError::AgentOnObstacle {
                agent: 0,
                cell: (1, 2),
            }))
        ));
    }

    #[test]
    fn placement_ignores_species() {
        let mask = ObstacleMask::all_open(4, 4);
        let store = AgentStore::from_agents(vec![Agent::new(1.0, 1.0, 0.0, SpeciesId(40), 0)]);
        assert!(check_placement(&store, &mask).is_ok());
    }
}

//! Reusable simulation fixtures.
//!
//! - [`trail_profile`]: a typical chemotaxis species.
//! - [`still_profile`]: a species that never moves.
//! - [`bordered_mask`]: open interior with a one-cell wall.
//! - [`random_agents`]: a reproducible scatter of agents.

use std::f32::consts::TAU;

use mycel_core::{SpeciesArrays, SpeciesId, SpeciesProfile};
use mycel_grid::ObstacleMask;
use mycel_kernels::{Agent, AgentStore};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A species that follows trails at one cell per tick.
pub fn trail_profile() -> SpeciesProfile {
    SpeciesProfile {
        speed: 1.0,
        turn_rate: 0.4,
        sensor_angle: 30f32.to_radians(),
        sensor_distance: 6.0,
        deposit_amount: 1.0,
    }
}

/// A species that stays where it is and deposits every tick.
pub fn still_profile() -> SpeciesProfile {
    SpeciesProfile {
        speed: 0.0,
        turn_rate: 0.0,
        sensor_angle: 0.0,
        sensor_distance: 0.0,
        deposit_amount: 1.0,
    }
}

/// Parallel arrays for `count` copies of `profile`.
pub fn repeated_species(profile: SpeciesProfile, count: usize) -> SpeciesArrays {
    SpeciesArrays {
        speeds: vec![profile.speed; count],
        turn_rates: vec![profile.turn_rate; count],
        sensor_angles: vec![profile.sensor_angle; count],
        sensor_distances: vec![profile.sensor_distance; count],
        deposit_amounts: vec![profile.deposit_amount; count],
    }
}

/// A `width × height` mask whose outermost ring of cells is blocked.
pub fn bordered_mask(width: u32, height: u32) -> ObstacleMask {
    let cells = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| x == 0 || y == 0 || x == width - 1 || y == height - 1)
        .collect();
    ObstacleMask::from_cells(width, height, cells).expect("extent matches")
}

/// A `width × height` mask with a single blocked cell.
pub fn single_wall_mask(width: u32, height: u32, wall: (u32, u32)) -> ObstacleMask {
    let mut cells = vec![false; width as usize * height as usize];
    cells[wall.1 as usize * width as usize + wall.0 as usize] = true;
    ObstacleMask::from_cells(width, height, cells).expect("extent matches")
}

/// An agent of `species` at `(x, y)` facing `heading`.
pub fn agent_at(x: f32, y: f32, heading: f32, species: u32) -> Agent {
    Agent::new(x, y, heading, SpeciesId(species), u64::from(species) + 1)
}

/// `count` agents of `species` scattered uniformly over the grid.
pub fn random_agents(width: u32, height: u32, count: usize, species: u32, seed: u64) -> AgentStore {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let agents = (0..count)
        .map(|_| {
            let x = rng.random_range(0.0..width as f32);
            let y = rng.random_range(0.0..height as f32);
            let heading = rng.random_range(0.0..TAU);
            Agent::new(x, y, heading, SpeciesId(species), rng.next_u64())
        })
        .collect();
    AgentStore::from_agents(agents)
}

//! Boundary handling for a proposed agent move.
//!
//! Two policies exist. With obstacles enabled a move into a blocked or
//! off-grid cell is refused and the agent turns around in place. Without
//! obstacles the agent is clamped back onto the grid and turns around if
//! any axis had to be clamped.

use std::f32::consts::PI;

use mycel_grid::ObstacleMask;

use crate::agent::Agent;

/// Boundary policy for the agent phase.
#[derive(Clone, Copy, Debug)]
pub enum Boundary<'a> {
    /// Reject moves into blocked or out-of-bounds cells.
    Obstacles(&'a ObstacleMask),
    /// Clamp positions into `[0, width) × [0, height)`.
    Clamp {
        /// Grid width, in cells.
        width: f32,
        /// Grid height, in cells.
        height: f32,
    },
}

/// What happened to a proposed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The agent moved to the proposed position.
    Moved,
    /// The proposed cell was blocked; position kept, heading reversed.
    Rejected,
    /// The position was clamped onto the grid; heading reversed.
    Clamped,
}

/// Apply `boundary` to a proposed move of `agent` to `(nx, ny)`.
///
/// Updates the agent's position and heading in place. The heading is not
/// normalized here.
pub fn resolve_move(agent: &mut Agent, nx: f32, ny: f32, boundary: Boundary<'_>) -> MoveOutcome {
    match boundary {
        Boundary::Obstacles(mask) => {
            if mask.blocks(nx, ny) {
                agent.heading += PI;
                MoveOutcome::Rejected
            } else {
                agent.x = nx;
                agent.y = ny;
                MoveOutcome::Moved
            }
        }
        Boundary::Clamp { width, height } => {
            let (x, x_clamped) = clamp_axis(nx, width);
            let (y, y_clamped) = clamp_axis(ny, height);
            agent.x = x;
            agent.y = y;
            // A corner hit still reverses only once.
            if x_clamped || y_clamped {
                agent.heading += PI;
                MoveOutcome::Clamped
            } else {
                MoveOutcome::Moved
            }
        }
    }
}

/// NaN clamps to the low edge.
fn clamp_axis(value: f32, extent: f32) -> (f32, bool) {
    if value.is_nan() || value < 0.0 {
        (0.0, true)
    } else if value >= extent {
        (extent - 1.0, true)
    } else {
        (value, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mycel_core::SpeciesId;

    fn agent_at(x: f32, y: f32, heading: f32) -> Agent {
        Agent::new(x, y, heading, SpeciesId(0), 0)
    }

    fn clamp(width: f32, height: f32) -> Boundary<'static> {
        Boundary::Clamp { width, height }
    }

    #[test]
    fn open_move_accepted() {
        let mask = ObstacleMask::all_open(8, 8);
        let mut a = agent_at(2.0, 2.0, 0.0);
        assert_eq!(resolve_move(&mut a, 3.0, 2.0, Boundary::Obstacles(&mask)), MoveOutcome::Moved);
        assert_eq!((a.x, a.y, a.heading), (3.0, 2.0, 0.0));
    }

    #[test]
    fn blocked_move_rejected_in_place() {
        let mut cells = vec![false; 64];
        cells[2 * 8 + 3] = true;
        let mask = ObstacleMask::from_cells(8, 8, cells).unwrap();
        let mut a = agent_at(2.5, 2.5, 0.5);
        let outcome = resolve_move(&mut a, 3.5, 2.5, Boundary::Obstacles(&mask));
        assert_eq!(outcome, MoveOutcome::Rejected);
        assert_eq!((a.x, a.y), (2.5, 2.5));
        assert_eq!(a.heading, 0.5 + PI);
    }

    #[test]
    fn off_grid_move_rejected_with_obstacles() {
        let mask = ObstacleMask::all_open(8, 8);
        let mut a = agent_at(7.5, 4.0, 0.0);
        let outcome = resolve_move(&mut a, 8.5, 4.0, Boundary::Obstacles(&mask));
        assert_eq!(outcome, MoveOutcome::Rejected);
        assert_eq!(a.x, 7.5);
    }

    #[test]
    fn clamp_high_edge() {
        let mut a = agent_at(15.5, 4.0, 0.0);
        assert_eq!(resolve_move(&mut a, 16.2, 4.0, clamp(16.0, 16.0)), MoveOutcome::Clamped);
        assert_eq!((a.x, a.y), (15.0, 4.0));
        assert_eq!(a.heading, PI);
    }

    #[test]
    fn clamp_low_edge() {
        let mut a = agent_at(0.2, 4.0, PI);
        assert_eq!(resolve_move(&mut a, -0.8, 4.0, clamp(16.0, 16.0)), MoveOutcome::Clamped);
        assert_eq!(a.x, 0.0);
        assert_eq!(a.heading, 2.0 * PI);
    }

    #[test]
    fn corner_clamp_flips_once() {
        let mut a = agent_at(15.5, 15.5, 1.0);
        assert_eq!(resolve_move(&mut a, 16.1, 16.1, clamp(16.0, 16.0)), MoveOutcome::Clamped);
        assert_eq!((a.x, a.y), (15.0, 15.0));
        assert_eq!(a.heading, 1.0 + PI);
    }

    #[test]
    fn nan_target_clamps_to_low_edge() {
        let mut a = agent_at(3.0, 3.0, 0.0);
        let outcome = resolve_move(&mut a, f32::NAN, 3.0, clamp(16.0, 16.0));
        assert_eq!(outcome, MoveOutcome::Clamped);
        assert_eq!((a.x, a.y), (0.0, 3.0));
        assert_eq!(a.heading, PI);
    }

    #[test]
    fn inside_clamp_moves() {
        let mut a = agent_at(3.0, 3.0, 0.0);
        assert_eq!(resolve_move(&mut a, 4.0, 3.0, clamp(16.0, 16.0)), MoveOutcome::Moved);
        assert_eq!(a.x, 4.0);
    }
}

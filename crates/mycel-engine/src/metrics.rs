//! Per-tick measurements for the simulation engine.

use smallvec::SmallVec;

/// Timing and agent counters collected during a single tick.
///
/// All durations are in microseconds. The stepper fills these in as the
/// tick runs; [`SimulationStepper::last_metrics`](crate::SimulationStepper::last_metrics)
/// returns the most recent complete set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the whole tick.
    pub total_us: u64,
    /// Time spent in the agent phase (sense, steer, move, deposit).
    pub agent_us: u64,
    /// Time spent in evaporation.
    pub decay_us: u64,
    /// Time spent across all blur passes.
    pub diffuse_us: u64,
    /// Blur passes actually run (0 when the radius is 0).
    pub blur_passes: u32,
    /// Agents that moved to their proposed position.
    pub agents_moved: usize,
    /// Agents whose move was refused by an obstacle or the grid edge.
    pub agents_rejected: usize,
    /// Agents clamped back onto the grid.
    pub agents_clamped: usize,
    /// Agents skipped because their species is unknown.
    pub agents_skipped: usize,
    /// Mass deposited per channel during the agent phase.
    pub deposited: SmallVec<[f64; 4]>,
}

impl StepMetrics {
    /// Total mass deposited across channels.
    pub fn total_deposited(&self) -> f64 {
        self.deposited.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.blur_passes, 0);
        assert_eq!(m.agents_moved + m.agents_rejected + m.agents_clamped, 0);
        assert_eq!(m.agents_skipped, 0);
        assert!(m.deposited.is_empty());
        assert_eq!(m.total_deposited(), 0.0);
    }

    #[test]
    fn total_deposited_sums_channels() {
        let m = StepMetrics {
            deposited: SmallVec::from_slice(&[1.5, 2.5, 0.0]),
            ..StepMetrics::default()
        };
        assert_eq!(m.total_deposited(), 4.0);
    }
}

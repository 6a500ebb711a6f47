//! The [`CellKernel`] trait for per-cell field passes.

use mycel_grid::FieldGrid;

/// A whole-field pass with one logical unit of work per cell.
///
/// `apply` must be complete when it returns: every cell written, and any
/// double buffer swapped. The stepper relies on that as the barrier
/// between phases.
pub trait CellKernel: Send + Sync {
    /// Human-readable name for logging and metrics.
    fn name(&self) -> &str;

    /// Run the pass over the whole field.
    fn apply(&self, field: &mut FieldGrid);
}

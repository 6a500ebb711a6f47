//! Phase (b): uniform evaporation of every field value.

use mycel_core::ConfigError;
use mycel_grid::FieldGrid;
use rayon::prelude::*;

use crate::kernel::CellKernel;

/// Slots handed to one rayon task.
const CHUNK: usize = 4096;

/// Multiplies every value in the field by a constant factor in `(0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaporation {
    factor: f32,
}

impl Evaporation {
    /// Create an evaporation kernel.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEvaporation`] unless `0 < factor < 1`.
    pub fn new(factor: f32) -> Result<Self, ConfigError> {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(ConfigError::InvalidEvaporation { value: factor });
        }
        Ok(Self { factor })
    }

    /// The multiplier applied per tick.
    pub fn factor(&self) -> f32 {
        self.factor
    }
}

impl CellKernel for Evaporation {
    fn name(&self) -> &str {
        "evaporation"
    }

    fn apply(&self, field: &mut FieldGrid) {
        let factor = self.factor;
        field
            .values_mut()
            .par_chunks_mut(CHUNK)
            .for_each(|chunk| chunk.iter_mut().for_each(|v| *v *= factor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_out_of_range() {
        for bad in [0.0, 1.0, -0.5, 1.5, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Evaporation::new(bad),
                Err(ConfigError::InvalidEvaporation { .. })
            ));
        }
    }

    #[test]
    fn scales_every_value() {
        let mut field = FieldGrid::new(3, 3, 2).unwrap();
        field.set(0, 0, 0, 2.0);
        field.set(2, 2, 1, 4.0);
        Evaporation::new(0.5).unwrap().apply(&mut field);
        assert_eq!(field.get(0, 0, 0), Some(1.0));
        assert_eq!(field.get(2, 2, 1), Some(2.0));
        assert_eq!(field.total_mass(), 3.0);
    }

    #[test]
    fn large_field_crosses_chunks() {
        let mut field = FieldGrid::new(128, 128, 1).unwrap();
        field.values_mut().fill(1.0);
        Evaporation::new(0.25).unwrap().apply(&mut field);
        assert!(field.values().iter().all(|&v| v == 0.25));
    }

    #[test]
    fn zero_stays_zero() {
        let mut field = FieldGrid::new(4, 4, 1).unwrap();
        Evaporation::new(0.9).unwrap().apply(&mut field);
        assert_eq!(field.total_mass(), 0.0);
    }

    proptest! {
        #[test]
        fn one_pass_multiplies_by_factor(
            factor in 0.001f32..0.999,
            values in prop::collection::vec(0.0f32..1.0e6, 1..64),
        ) {
            let mut field = FieldGrid::new(values.len() as u32, 1, 1).unwrap();
            field.values_mut().copy_from_slice(&values);
            Evaporation::new(factor).unwrap().apply(&mut field);
            for (&after, &before) in field.values().iter().zip(&values) {
                let expected = before * factor;
                prop_assert!((after - expected).abs() <= expected * 1e-6);
            }
        }
    }
}

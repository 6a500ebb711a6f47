//! Per-species movement, sensing, and deposit constants.
//!
//! The table is built once from parallel per-species arrays, validated,
//! and never mutated afterwards. Lookups are bounds-checked: an id past
//! the end yields `None` rather than undefined behaviour.

use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::id::SpeciesId;

/// Immutable behaviour constants for one species.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeciesProfile {
    /// Distance moved per tick, in cells.
    pub speed: f32,
    /// Heading change applied when steering left or right, in radians.
    pub turn_rate: f32,
    /// Angle between the forward sensor and each side sensor, in radians.
    pub sensor_angle: f32,
    /// Distance from the agent to each sensor probe, in cells.
    pub sensor_distance: f32,
    /// Base amount deposited per tick (before the population deposit scale).
    pub deposit_amount: f32,
}

impl SpeciesProfile {
    fn validate(&self) -> Result<(), ConfigError> {
        finite("turn_rate", self.turn_rate)?;
        finite("sensor_angle", self.sensor_angle)?;
        non_negative("speed", self.speed)?;
        non_negative("sensor_distance", self.sensor_distance)?;
        non_negative("deposit_amount", self.deposit_amount)?;
        Ok(())
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            expected: "finite",
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            expected: "finite and >= 0",
        })
    }
}

/// Parallel per-species parameter arrays, as supplied by configuration.
///
/// Every array must have exactly one entry per species.
/// Sensor angles are in radians; see
/// [`with_sensor_angles_deg`](SpeciesArrays::with_sensor_angles_deg).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpeciesArrays {
    /// Per-species speed.
    pub speeds: Vec<f32>,
    /// Per-species turn rate (radians).
    pub turn_rates: Vec<f32>,
    /// Per-species sensor angle (radians).
    pub sensor_angles: Vec<f32>,
    /// Per-species sensor distance.
    pub sensor_distances: Vec<f32>,
    /// Per-species deposit amount.
    pub deposit_amounts: Vec<f32>,
}

impl SpeciesArrays {
    /// Arrays describing a single species.
    pub fn single(profile: SpeciesProfile) -> Self {
        Self {
            speeds: vec![profile.speed],
            turn_rates: vec![profile.turn_rate],
            sensor_angles: vec![profile.sensor_angle],
            sensor_distances: vec![profile.sensor_distance],
            deposit_amounts: vec![profile.deposit_amount],
        }
    }

    /// Replace the sensor angles with values given in degrees.
    pub fn with_sensor_angles_deg(mut self, degrees: &[f32]) -> Self {
        self.sensor_angles = degrees.iter().map(|d| d.to_radians()).collect();
        self
    }
}

/// Validated, immutable table of [`SpeciesProfile`]s keyed by [`SpeciesId`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesProfileTable {
    profiles: SmallVec<[SpeciesProfile; 4]>,
}

impl SpeciesProfileTable {
    /// Build a table from already-assembled profiles.
    ///
    /// Fails if `profiles` is empty or any value is out of range.
    pub fn new(profiles: impl IntoIterator<Item = SpeciesProfile>) -> Result<Self, ConfigError> {
        let profiles: SmallVec<[SpeciesProfile; 4]> = profiles.into_iter().collect();
        if profiles.is_empty() {
            return Err(ConfigError::NoSpecies);
        }
        for p in &profiles {
            p.validate()?;
        }
        Ok(Self { profiles })
    }

    /// Build a table for `species_count` species from parallel arrays.
    ///
    /// Every array in `arrays` must have length `species_count`; the first
    /// mismatching array is named in the error.
    pub fn from_arrays(species_count: usize, arrays: &SpeciesArrays) -> Result<Self, ConfigError> {
        if species_count == 0 {
            return Err(ConfigError::NoSpecies);
        }
        let columns: [(&'static str, &[f32]); 5] = [
            ("speeds", arrays.speeds.as_slice()),
            ("turn_rates", arrays.turn_rates.as_slice()),
            ("sensor_angles", arrays.sensor_angles.as_slice()),
            ("sensor_distances", arrays.sensor_distances.as_slice()),
            ("deposit_amounts", arrays.deposit_amounts.as_slice()),
        ];
        for (array, values) in columns {
            if values.len() != species_count {
                return Err(ConfigError::SpeciesArrayLength {
                    array,
                    expected: species_count,
                    actual: values.len(),
                });
            }
        }
        Self::new((0..species_count).map(|i| SpeciesProfile {
            speed: arrays.speeds[i],
            turn_rate: arrays.turn_rates[i],
            sensor_angle: arrays.sensor_angles[i],
            sensor_distance: arrays.sensor_distances[i],
            deposit_amount: arrays.deposit_amounts[i],
        }))
    }

    /// Look up a species. Returns `None` for an id past the end of the table.
    pub fn get(&self, id: SpeciesId) -> Option<&SpeciesProfile> {
        self.profiles.get(id.index())
    }

    /// Number of species (and field channels).
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always `false` for a constructed table; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Iterate `(id, profile)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, &SpeciesProfile)> {
        self.profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (SpeciesId(i as u32), p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn profile() -> SpeciesProfile {
        SpeciesProfile {
            speed: 1.0,
            turn_rate: 0.3,
            sensor_angle: 0.5,
            sensor_distance: 7.0,
            deposit_amount: 0.1,
        }
    }

    fn two_species() -> SpeciesArrays {
        SpeciesArrays {
            speeds: vec![0.3, 0.5],
            turn_rates: vec![0.3, 0.2],
            sensor_angles: vec![0.4, 0.6],
            sensor_distances: vec![7.0, 10.0],
            deposit_amounts: vec![0.1, 0.1],
        }
    }

    #[test]
    fn from_arrays_zips_columns() {
        let table = SpeciesProfileTable::from_arrays(2, &two_species()).unwrap();
        assert_eq!(table.len(), 2);
        let second = table.get(SpeciesId(1)).unwrap();
        assert_eq!(second.speed, 0.5);
        assert_eq!(second.sensor_distance, 10.0);
    }

    #[test]
    fn length_mismatch_names_array() {
        let mut arrays = two_species();
        arrays.sensor_distances.pop();
        let err = SpeciesProfileTable::from_arrays(2, &arrays).unwrap_err();
        assert_eq!(
            err,
            ConfigError::SpeciesArrayLength {
                array: "sensor_distances",
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn count_larger_than_arrays_rejected() {
        let err = SpeciesProfileTable::from_arrays(3, &two_species()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SpeciesArrayLength {
                array: "speeds",
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn zero_species_rejected() {
        assert_eq!(
            SpeciesProfileTable::from_arrays(0, &SpeciesArrays::default()),
            Err(ConfigError::NoSpecies)
        );
        assert_eq!(
            SpeciesProfileTable::new(Vec::new()),
            Err(ConfigError::NoSpecies)
        );
    }

    #[test]
    fn negative_deposit_rejected() {
        let mut p = profile();
        p.deposit_amount = -0.5;
        let err = SpeciesProfileTable::new([p]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "deposit_amount",
                ..
            }
        ));
    }

    #[test]
    fn nan_turn_rate_rejected() {
        let mut p = profile();
        p.turn_rate = f32::NAN;
        assert!(SpeciesProfileTable::new([p]).is_err());
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let table = SpeciesProfileTable::new([profile()]).unwrap();
        assert!(table.get(SpeciesId(0)).is_some());
        assert!(table.get(SpeciesId(1)).is_none());
        assert!(table.get(SpeciesId(u32::MAX)).is_none());
    }

    #[test]
    fn degrees_are_converted() {
        let arrays = SpeciesArrays::single(profile()).with_sensor_angles_deg(&[180.0]);
        assert!((arrays.sensor_angles[0] - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn iter_yields_ids_in_order() {
        let table = SpeciesProfileTable::from_arrays(2, &two_species()).unwrap();
        let ids: Vec<SpeciesId> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![SpeciesId(0), SpeciesId(1)]);
    }

    proptest! {
        #[test]
        fn any_valid_lengths_build(n in 1usize..8) {
            let arrays = SpeciesArrays {
                speeds: vec![1.0; n],
                turn_rates: vec![0.2; n],
                sensor_angles: vec![0.5; n],
                sensor_distances: vec![3.0; n],
                deposit_amounts: vec![0.1; n],
            };
            let table = SpeciesProfileTable::from_arrays(n, &arrays).unwrap();
            prop_assert_eq!(table.len(), n);
            prop_assert!(table.get(SpeciesId(n as u32)).is_none());
        }
    }
}

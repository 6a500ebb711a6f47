//! Benchmark profiles for the Mycel trail simulation.
//!
//! - [`reference_profile`]: 256x256 grid, 2 species, 50K agents
//! - [`stress_profile`]: 1024x1024 grid, 2 species, 500K agents

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use mycel_core::SpeciesArrays;
use mycel_engine::SimConfig;

/// Two contrasting species: a fast wide-sensing one and a slow tight one.
pub fn two_species() -> SpeciesArrays {
    SpeciesArrays {
        speeds: vec![1.5, 1.0],
        turn_rates: vec![0.3, 0.5],
        sensor_angles: Vec::new(),
        sensor_distances: vec![9.0, 5.0],
        deposit_amounts: vec![0.5, 0.8],
    }
    .with_sensor_angles_deg(&[30.0, 45.0])
}

/// Reference profile: 256x256 grid (65K cells), 2 species, 50K agents.
///
/// Blur radius 1, one pass per tick, obstacles disabled.
pub fn reference_profile(seed: u64) -> SimConfig {
    let mut config = SimConfig::new(256, 256, two_species(), vec![25_000, 25_000]);
    config.seed = seed;
    config.deposit_target_mass = 50_000.0;
    config
}

/// Stress profile: 1024x1024 grid (~1M cells), 2 species, 500K agents.
pub fn stress_profile(seed: u64) -> SimConfig {
    let mut config = SimConfig::new(1024, 1024, two_species(), vec![250_000, 250_000]);
    config.seed = seed;
    config.deposit_target_mass = 500_000.0;
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        assert!(reference_profile(1).validate().is_ok());
        assert!(stress_profile(1).validate().is_ok());
        assert_eq!(reference_profile(1).total_agents(), 50_000);
    }
}

//! Three-probe chemotaxis: sense the agent's own channel ahead, to the
//! left, and to the right, then steer toward the strongest reading.

use mycel_core::SpeciesProfile;
use mycel_grid::FieldGrid;

/// Field values under the three sensor probes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SensorReading {
    /// Probe at `heading - sensor_angle`.
    pub left: f32,
    /// Probe at `heading`.
    pub forward: f32,
    /// Probe at `heading + sensor_angle`.
    pub right: f32,
}

/// Read `channel` at the three probe points of an agent at `(x, y)`.
///
/// Each probe lies `sensor_distance` from the agent. Probes that land
/// outside the grid read `0.0`.
pub fn sense(
    field: &FieldGrid,
    x: f32,
    y: f32,
    heading: f32,
    profile: &SpeciesProfile,
    channel: usize,
) -> SensorReading {
    let probe = |angle: f32| {
        let px = x + angle.cos() * profile.sensor_distance;
        let py = y + angle.sin() * profile.sensor_distance;
        field.sample(px, py, channel)
    };
    SensorReading {
        left: probe(heading - profile.sensor_angle),
        forward: probe(heading),
        right: probe(heading + profile.sensor_angle),
    }
}

/// New heading after steering on `reading`.
///
/// Forward wins ties with either side. Otherwise turn toward the larger
/// side; equal sides turn right.
pub fn steer(heading: f32, reading: SensorReading, turn_rate: f32) -> f32 {
    if reading.forward >= reading.left && reading.forward >= reading.right {
        heading
    } else if reading.left > reading.right {
        heading - turn_rate
    } else {
        heading + turn_rate
    }
}

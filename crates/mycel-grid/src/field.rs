//! The multi-channel trail map.
//!
//! Storage is cell-major with interleaved channels:
//! `values[(y * width + x) * channels + channel]`. Each species owns the
//! channel with its index. Values start at zero and stay non-negative as
//! long as every deposit is non-negative and every pass is a convex
//! combination (decay by a factor in `(0, 1)`, neighbourhood mean).

use mycel_core::ConfigError;

use crate::pingpong::PingPongBuffer;

/// Width × height grid of per-species scalar accumulators.
#[derive(Clone, Debug)]
pub struct FieldGrid {
    width: u32,
    height: u32,
    channels: usize,
    buffers: PingPongBuffer,
}

impl FieldGrid {
    /// Create a zeroed field of `width * height` cells with `channels`
    /// slots each.
    ///
    /// Fails if either dimension is zero, `channels` is zero, or the total
    /// slot count does not fit in `u32`.
    pub fn new(width: u32, height: u32, channels: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension { width, height });
        }
        if channels == 0 {
            return Err(ConfigError::NoSpecies);
        }
        let slots = u64::from(width) * u64::from(height) * channels as u64;
        if u32::try_from(slots).is_err() {
            return Err(ConfigError::CellCountOverflow { value: slots });
        }
        Ok(Self {
            width,
            height,
            channels,
            buffers: PingPongBuffer::zeroed(slots as usize),
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of channels per cell.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of cells (`width * height`).
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of cell `(x, y)`. Does not bounds-check.
    pub fn cell_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Cell containing the continuous position `(x, y)`, or `None` if the
    /// position lies outside `[0, width) × [0, height)`.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<usize> {
        // Written so that NaN falls through to `None`.
        if !(x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32) {
            return None;
        }
        let cx = (x as u32).min(self.width - 1);
        let cy = (y as u32).min(self.height - 1);
        Some(self.cell_index(cx, cy))
    }

    /// Value of `channel` at integer cell `(x, y)`, or `None` if out of range.
    pub fn get(&self, x: u32, y: u32, channel: usize) -> Option<f32> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return None;
        }
        Some(self.buffers.front()[self.cell_index(x, y) * self.channels + channel])
    }

    /// Overwrite `channel` at integer cell `(x, y)`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, channel: usize, value: f32) {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return;
        }
        let slot = self.cell_index(x, y) * self.channels + channel;
        self.buffers.front_mut()[slot] = value;
    }

    /// Sensor read: value of `channel` at the cell containing `(x, y)`.
    ///
    /// Probes outside the grid, and channels the field does not have,
    /// read as `0.0`.
    pub fn sample(&self, x: f32, y: f32, channel: usize) -> f32 {
        if channel >= self.channels {
            return 0.0;
        }
        match self.cell_at(x, y) {
            Some(cell) => self.buffers.front()[cell * self.channels + channel],
            None => 0.0,
        }
    }

    /// Accumulate `amount` into `channel` of `cell` (row-major index).
    ///
    /// Always an addition, never an overwrite. Out-of-range targets are ignored.
    pub fn add(&mut self, cell: usize, channel: usize, amount: f32) {
        if cell >= self.cell_count() || channel >= self.channels {
            return;
        }
        let slot = cell * self.channels + channel;
        self.buffers.front_mut()[slot] += amount;
    }

    /// All slots of the current buffer, cell-major with interleaved channels.
    pub fn values(&self) -> &[f32] {
        self.buffers.front()
    }

    /// Mutable access to the current buffer, for in-place per-cell passes.
    pub fn values_mut(&mut self) -> &mut [f32] {
        self.buffers.front_mut()
    }

    /// Borrow the current values for reading and the scratch buffer for
    /// writing; follow with [`swap_buffers`](Self::swap_buffers).
    pub fn split_buffers(&mut self) -> (&[f32], &mut [f32]) {
        self.buffers.split()
    }

    /// Publish the scratch buffer written through
    /// [`split_buffers`](Self::split_buffers) as the current values.
    pub fn swap_buffers(&mut self) {
        self.buffers.swap();
    }

    /// Sum of one channel over all cells, accumulated in `f64`.
    pub fn channel_mass(&self, channel: usize) -> f64 {
        if channel >= self.channels {
            return 0.0;
        }
        self.buffers
            .front()
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .map(|&v| f64::from(v))
            .sum()
    }

    /// Sum over every channel and cell, accumulated in `f64`.
    pub fn total_mass(&self) -> f64 {
        self.buffers.front().iter().map(|&v| f64::from(v)).sum()
    }

    /// First slot holding NaN or infinity, as `(cell, channel)`.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        self.buffers
            .front()
            .iter()
            .position(|v| !v.is_finite())
            .map(|slot| (slot / self.channels, slot % self.channels))
    }

    /// Zero every cell of every channel.
    pub fn clear(&mut self) {
        self.buffers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zeroed() {
        let grid = FieldGrid::new(4, 3, 2).unwrap();
        assert_eq!(grid.cell_count(), 12);
        assert_eq!(grid.values().len(), 24);
        assert!(grid.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_dimension_rejected() {
        assert_eq!(
            FieldGrid::new(0, 5, 1).unwrap_err(),
            ConfigError::ZeroDimension {
                width: 0,
                height: 5
            }
        );
        assert!(FieldGrid::new(5, 0, 1).is_err());
    }

    #[test]
    fn zero_channels_rejected() {
        assert_eq!(FieldGrid::new(2, 2, 0).unwrap_err(), ConfigError::NoSpecies);
    }

    #[test]
    fn oversized_rejected() {
        let err = FieldGrid::new(u32::MAX, 2, 1).unwrap_err();
        assert!(matches!(err, ConfigError::CellCountOverflow { .. }));
    }

    #[test]
    fn channels_are_independent() {
        let mut grid = FieldGrid::new(3, 3, 2).unwrap();
        let cell = grid.cell_index(1, 2);
        grid.add(cell, 1, 0.75);
        assert_eq!(grid.get(1, 2, 1), Some(0.75));
        assert_eq!(grid.get(1, 2, 0), Some(0.0));
        assert_eq!(grid.channel_mass(0), 0.0);
        assert!((grid.channel_mass(1) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn add_accumulates() {
        let mut grid = FieldGrid::new(2, 2, 1).unwrap();
        for _ in 0..4 {
            grid.add(3, 0, 0.25);
        }
        assert_eq!(grid.get(1, 1, 0), Some(1.0));
    }

    #[test]
    fn sample_outside_reads_zero() {
        let mut grid = FieldGrid::new(4, 4, 1).unwrap();
        grid.values_mut().fill(1.0);
        assert_eq!(grid.sample(2.5, 3.9, 0), 1.0);
        assert_eq!(grid.sample(-0.1, 1.0, 0), 0.0);
        assert_eq!(grid.sample(4.0, 1.0, 0), 0.0);
        assert_eq!(grid.sample(1.0, 4.0, 0), 0.0);
        assert_eq!(grid.sample(f32::NAN, 1.0, 0), 0.0);
        assert_eq!(grid.sample(1.0, 1.0, 3), 0.0);
    }

    #[test]
    fn cell_at_truncates_toward_zero() {
        let grid = FieldGrid::new(16, 16, 1).unwrap();
        assert_eq!(grid.cell_at(9.0, 8.0), Some(8 * 16 + 9));
        assert_eq!(grid.cell_at(9.99, 8.01), Some(8 * 16 + 9));
        assert_eq!(grid.cell_at(16.0, 0.0), None);
    }

    #[test]
    fn out_of_range_writes_ignored() {
        let mut grid = FieldGrid::new(2, 2, 1).unwrap();
        grid.add(99, 0, 1.0);
        grid.add(0, 5, 1.0);
        grid.set(9, 9, 0, 1.0);
        assert_eq!(grid.total_mass(), 0.0);
    }

    #[test]
    fn split_and_swap_publish_scratch() {
        let mut grid = FieldGrid::new(2, 1, 1).unwrap();
        grid.set(0, 0, 0, 4.0);
        {
            let (src, dst) = grid.split_buffers();
            dst[0] = src[0] / 2.0;
            dst[1] = src[1];
        }
        assert_eq!(grid.get(0, 0, 0), Some(4.0));
        grid.swap_buffers();
        assert_eq!(grid.get(0, 0, 0), Some(2.0));
    }

    #[test]
    fn non_finite_located() {
        let mut grid = FieldGrid::new(3, 1, 2).unwrap();
        assert_eq!(grid.first_non_finite(), None);
        grid.set(2, 0, 1, f32::INFINITY);
        assert_eq!(grid.first_non_finite(), Some((2, 1)));
    }
}

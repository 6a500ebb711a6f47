//! Read-only views of a settled field.
//!
//! Renderers only ever see the field between ticks. [`FieldSnapshot`]
//! borrows it in place; [`OwnedFieldSnapshot`] is a cheap-to-clone copy
//! that can be sent across threads.

use std::sync::Arc;

use mycel_core::TickId;

use crate::field::FieldGrid;

/// Read access shared by borrowed and owned snapshots.
///
/// Implementors supply the extent and the raw cell-major slice; the
/// per-cell and per-channel accessors are derived from those.
pub trait FieldRead {
    /// Tick after which the snapshot was taken.
    fn tick_id(&self) -> TickId;

    /// Grid width in cells.
    fn width(&self) -> u32;

    /// Grid height in cells.
    fn height(&self) -> u32;

    /// Channels per cell.
    fn channels(&self) -> usize;

    /// All slots, cell-major with interleaved channels.
    fn as_slice(&self) -> &[f32];

    /// Value of `channel` at `(x, y)`, or `None` if out of range.
    fn read(&self, x: u32, y: u32, channel: usize) -> Option<f32> {
        if x >= self.width() || y >= self.height() || channel >= self.channels() {
            return None;
        }
        let cell = y as usize * self.width() as usize + x as usize;
        self.as_slice().get(cell * self.channels() + channel).copied()
    }

    /// Row-major values of one channel. Empty if the channel does not exist.
    fn channel(&self, channel: usize) -> ChannelIter<'_> {
        let stride = self.channels();
        let slice: &[f32] = if channel < stride {
            &self.as_slice()[channel..]
        } else {
            &[]
        };
        ChannelIter {
            inner: slice.iter().step_by(stride.max(1)),
        }
    }

    /// Sum of one channel over all cells.
    fn channel_mass(&self, channel: usize) -> f64 {
        self.channel(channel).map(f64::from).sum()
    }
}

/// Iterator over one channel of a snapshot, in row-major cell order.
pub struct ChannelIter<'a> {
    inner: std::iter::StepBy<std::slice::Iter<'a, f32>>,
}

impl Iterator for ChannelIter<'_> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Borrowed view of the field after a tick has settled.
#[derive(Clone, Copy, Debug)]
pub struct FieldSnapshot<'a> {
    tick: TickId,
    field: &'a FieldGrid,
}

impl<'a> FieldSnapshot<'a> {
    /// Wrap a settled field.
    pub fn new(tick: TickId, field: &'a FieldGrid) -> Self {
        Self { tick, field }
    }

    /// Copy into an [`OwnedFieldSnapshot`].
    pub fn to_owned_snapshot(&self) -> OwnedFieldSnapshot {
        OwnedFieldSnapshot {
            tick: self.tick,
            width: self.field.width(),
            height: self.field.height(),
            channels: self.field.channels(),
            data: Arc::from(self.field.values()),
        }
    }
}

impl FieldRead for FieldSnapshot<'_> {
    fn tick_id(&self) -> TickId {
        self.tick
    }

    fn width(&self) -> u32 {
        self.field.width()
    }

    fn height(&self) -> u32 {
        self.field.height()
    }

    fn channels(&self) -> usize {
        self.field.channels()
    }

    fn as_slice(&self) -> &[f32] {
        self.field.values()
    }
}

/// Owned, `Arc`-backed copy of a settled field.
///
/// Cloning shares the underlying buffer.
#[derive(Clone, Debug)]
pub struct OwnedFieldSnapshot {
    tick: TickId,
    width: u32,
    height: u32,
    channels: usize,
    data: Arc<[f32]>,
}

impl FieldRead for OwnedFieldSnapshot {
    fn tick_id(&self) -> TickId {
        self.tick
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> FieldGrid {
        let mut grid = FieldGrid::new(3, 2, 2).unwrap();
        grid.set(0, 0, 0, 1.0);
        grid.set(2, 1, 0, 2.0);
        grid.set(1, 0, 1, 5.0);
        grid
    }

    #[test]
    fn borrowed_reads_through() {
        let grid = field();
        let snap = FieldSnapshot::new(TickId(4), &grid);
        assert_eq!(snap.tick_id(), TickId(4));
        assert_eq!(snap.read(2, 1, 0), Some(2.0));
        assert_eq!(snap.read(1, 0, 1), Some(5.0));
        assert_eq!(snap.read(3, 0, 0), None);
        assert_eq!(snap.read(0, 0, 2), None);
    }

    #[test]
    fn channel_iterates_row_major() {
        let grid = field();
        let snap = FieldSnapshot::new(TickId(1), &grid);
        let ch0: Vec<f32> = snap.channel(0).collect();
        assert_eq!(ch0, vec![1.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
        let ch1: Vec<f32> = snap.channel(1).collect();
        assert_eq!(ch1, vec![0.0, 5.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(snap.channel(2).count(), 0);
        assert!((snap.channel_mass(0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn owned_copy_is_detached() {
        let mut grid = field();
        let owned = FieldSnapshot::new(TickId(2), &grid).to_owned_snapshot();
        grid.clear();
        assert_eq!(owned.read(2, 1, 0), Some(2.0));
        assert_eq!(owned.tick_id(), TickId(2));
        assert_eq!((owned.width(), owned.height(), owned.channels()), (3, 2, 2));
        let shared = owned.clone();
        assert_eq!(shared.as_slice().as_ptr(), owned.as_slice().as_ptr());
    }
}

//! Static blocked/open cell mask.
//!
//! Loaded once before the first tick and never mutated. When obstacles are
//! disabled the engine still carries an all-open mask, so kernels never
//! branch on its presence.

use std::path::Path;

use mycel_core::ResourceError;

/// Normalized luminance below which an image pixel counts as blocked.
///
/// Dark pixels are walls; anything at or above this level is open.
pub const BLOCKED_LUMA_THRESHOLD: f32 = 0.1;

/// Width × height grid of blocked (`true`) / open (`false`) cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleMask {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
    open: usize,
}

impl ObstacleMask {
    /// A mask with every cell open.
    pub fn all_open(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            blocked: vec![false; n],
            open: n,
        }
    }

    /// Build a mask from row-major blocked flags.
    ///
    /// `blocked.len()` must equal `width * height`.
    pub fn from_cells(width: u32, height: u32, blocked: Vec<bool>) -> Result<Self, ResourceError> {
        let expected = width as usize * height as usize;
        if blocked.len() != expected {
            return Err(ResourceError::ObstacleCellCount {
                expected,
                actual: blocked.len(),
            });
        }
        let open = blocked.iter().filter(|&&b| !b).count();
        Ok(Self {
            width,
            height,
            blocked,
            open,
        })
    }

    /// Build a mask from row-major 8-bit luminance samples.
    ///
    /// A pixel is blocked when `luma / 255 < BLOCKED_LUMA_THRESHOLD`.
    pub fn from_luma(width: u32, height: u32, luma: &[u8]) -> Result<Self, ResourceError> {
        let blocked = luma
            .iter()
            .map(|&v| f32::from(v) / 255.0 < BLOCKED_LUMA_THRESHOLD)
            .collect();
        Self::from_cells(width, height, blocked)
    }

    /// Decode an image file and threshold its luminance.
    ///
    /// Any format the enabled `image` decoders understand is accepted;
    /// colour images are converted to 8-bit luma first.
    pub fn from_image_path(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| ResourceError::ObstacleUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let luma = img.to_luma8();
        let (width, height) = luma.dimensions();
        Self::from_luma(width, height, luma.as_raw())
    }

    /// Check that this mask covers exactly a `width × height` grid.
    pub fn ensure_extent(&self, width: u32, height: u32) -> Result<(), ResourceError> {
        if self.width != width || self.height != height {
            return Err(ResourceError::ObstacleExtentMismatch {
                expected: (width, height),
                actual: (self.width, self.height),
            });
        }
        Ok(())
    }

    /// Mask width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether integer cell `(x, y)` is blocked. Cells outside the mask are blocked.
    pub fn is_blocked(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return true;
        }
        self.blocked[y as usize * self.width as usize + x as usize]
    }

    /// Whether the continuous position `(x, y)` is blocked.
    ///
    /// Positions outside `[0, width) × [0, height)` (and NaN) are blocked.
    pub fn blocks(&self, x: f32, y: f32) -> bool {
        if !(x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32) {
            return true;
        }
        self.is_blocked(x as u32, y as u32)
    }

    /// Number of open cells.
    pub fn open_count(&self) -> usize {
        self.open
    }

    /// Whether no cell is blocked.
    pub fn is_all_open(&self) -> bool {
        self.open == self.blocked.len()
    }

    /// First open cell at or after `start` in row-major order, wrapping
    /// around to the beginning. `None` if every cell is blocked.
    pub fn next_open_cell(&self, start: usize) -> Option<usize> {
        let n = self.blocked.len();
        if self.open == 0 || n == 0 {
            return None;
        }
        (0..n)
            .map(|offset| (start + offset) % n)
            .find(|&cell| !self.blocked[cell])
    }
}

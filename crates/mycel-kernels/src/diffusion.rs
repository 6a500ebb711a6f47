//! Phase (c): box blur with a clipped square neighbourhood.
//!
//! Each output value is the mean of the input values within Chebyshev
//! distance `radius` of the cell, per channel. At the edges the window is
//! clipped to the grid and the divisor shrinks with it, so a uniform field
//! stays uniform. Reads come from the front buffer and writes go to the
//! back buffer; the buffers are swapped once the pass is complete.

use mycel_grid::FieldGrid;
use rayon::prelude::*;

use crate::kernel::CellKernel;

/// Square-neighbourhood mean filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxBlur {
    radius: u32,
}

impl BoxBlur {
    /// Create a blur of the given radius. Radius 0 is the identity.
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }

    /// Half-width of the window, in cells.
    pub fn radius(&self) -> u32 {
        self.radius
    }
}

impl CellKernel for BoxBlur {
    fn name(&self) -> &str {
        "box_blur"
    }

    fn apply(&self, field: &mut FieldGrid) {
        if self.radius == 0 {
            return;
        }
        let w = field.width() as usize;
        let h = field.height() as usize;
        let c = field.channels();
        let r = self.radius as usize;
        let (src, dst) = field.split_buffers();

        dst.par_chunks_mut(w * c).enumerate().for_each(|(y, row)| {
            let y0 = y.saturating_sub(r);
            let y1 = y.saturating_add(r).min(h - 1);
            for x in 0..w {
                let x0 = x.saturating_sub(r);
                let x1 = x.saturating_add(r).min(w - 1);
                let count = ((y1 - y0 + 1) * (x1 - x0 + 1)) as f32;

                let out = &mut row[x * c..(x + 1) * c];
                out.fill(0.0);
                for ny in y0..=y1 {
                    let line = ny * w;
                    for nx in x0..=x1 {
                        let base = (line + nx) * c;
                        for (o, v) in out.iter_mut().zip(&src[base..base + c]) {
                            *o += v;
                        }
                    }
                }
                for o in out.iter_mut() {
                    *o /= count;
                }
            }
        });

        field.swap_buffers();
    }
}

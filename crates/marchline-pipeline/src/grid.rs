//! Binary occupancy grid built from the working raster.
//!
//! One cell per `step x step` block of the image, plus one sentinel row
//! and column so the march phase can read every cell's right/bottom
//! neighbors without re-sampling.
//!
//! # Phase invariant
//!
//! Interior sampling and the boundary fix-up both run inside the *same*
//! barrier epoch with no barrier in between. This is safe only because
//! the two sub-phases write disjoint cells (interior cells vs. the last
//! row/column) and because no cell is read until after the barrier that
//! follows the epoch. Do not introduce grid reads into either sub-phase.

use std::ops::Range;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::raster::SharedRaster;
use crate::types::Dimensions;

/// Shared occupancy grid of single-bit cells stored as atomic bytes.
///
/// `cols`/`rows` count the interior cells; storage includes one extra
/// row and column of boundary/sentinel cells, so valid coordinates run
/// through `cols` and `rows` inclusive.
pub struct OccupancyGrid {
    cols: u32,
    rows: u32,
    cells: Vec<AtomicU8>,
}

impl OccupancyGrid {
    /// Allocate the grid for a working raster of the given dimensions.
    ///
    /// `step` must be nonzero (validated by the pipeline configuration).
    #[must_use]
    pub fn new(dimensions: Dimensions, step: u32) -> Self {
        let cols = dimensions.width / step;
        let rows = dimensions.height / step;
        let len = (cols as usize + 1) * (rows as usize + 1);
        Self {
            cols,
            rows,
            cells: std::iter::repeat_with(|| AtomicU8::new(0)).take(len).collect(),
        }
    }

    /// Interior cell count along the x axis.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Interior cell count along the y axis.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    fn index(&self, gx: u32, gy: u32) -> usize {
        debug_assert!(gx <= self.cols && gy <= self.rows, "cell out of bounds");
        gy as usize * (self.cols as usize + 1) + gx as usize
    }

    /// Read the cell at `(gx, gy)`; valid through the sentinel row/column.
    #[must_use]
    pub fn get(&self, gx: u32, gy: u32) -> u8 {
        self.cells[self.index(gx, gy)].load(Ordering::Relaxed)
    }

    /// Write the cell at `(gx, gy)`.
    pub fn set(&self, gx: u32, gy: u32, bit: u8) {
        self.cells[self.index(gx, gy)].store(bit, Ordering::Relaxed);
    }

    /// Sample the interior cells for the worker's grid-row partition.
    ///
    /// Each cell samples the pixel at the top-left grid-aligned screen
    /// location `(gx*step, gy*step)` and becomes 1 when the luminance is
    /// at or below `threshold`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample_interior(
        &self,
        raster: &SharedRaster,
        step: u32,
        threshold: u8,
        grid_rows: Range<usize>,
    ) {
        for gy in grid_rows {
            let gy = gy as u32;
            for gx in 0..self.cols {
                let lum = raster.luminance(gx * step, gy * step);
                self.set(gx, gy, occupancy(lum, threshold));
            }
        }
    }

    /// Fix up the grid's last row and last column for the worker's
    /// partitions of each boundary axis.
    ///
    /// Boundary cells would otherwise sample beyond the image edge, so
    /// they sample the image's actual last row/column of pixels instead.
    /// Runs in the same barrier epoch as [`Self::sample_interior`]; see
    /// the module invariant.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fix_boundary(
        &self,
        raster: &SharedRaster,
        step: u32,
        threshold: u8,
        last_row_cols: Range<usize>,
        last_col_rows: Range<usize>,
    ) {
        for gx in last_row_cols {
            let gx = gx as u32;
            let lum = raster.luminance(gx * step, raster.height() - 1);
            self.set(gx, self.rows, occupancy(lum, threshold));
        }
        for gy in last_col_rows {
            let gy = gy as u32;
            let lum = raster.luminance(raster.width() - 1, gy * step);
            self.set(self.cols, gy, occupancy(lum, threshold));
        }
    }

    /// Zero the single corner cell no partition naturally covers.
    ///
    /// Leader-only singleton action: exactly one worker calls this per
    /// run, making the corner deterministic regardless of image content.
    pub fn write_sentinel(&self) {
        self.set(self.cols, self.rows, 0);
    }
}

/// Threshold rule shared by interior sampling and the boundary fix-up.
const fn occupancy(luminance: u8, threshold: u8) -> u8 {
    if luminance <= threshold { 1 } else { 0 }
}

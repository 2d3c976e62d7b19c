//! Marching-squares contour stitching.
//!
//! For each grid cell the four corner bits form a configuration code
//! that selects one pre-rendered tile, which is copied verbatim into
//! the working image over that cell's pixel block.
//!
//! This phase strictly follows the grid barrier: a cell's right/bottom
//! neighbors may lie outside the worker's own grid-write partition, so
//! every read here depends on the barrier having published all of
//! phase 2's writes.

use std::ops::Range;

use image::RgbImage;

use crate::grid::OccupancyGrid;
use crate::raster::SharedRaster;
use crate::tiles::TileLibrary;

/// Compute the 4-bit configuration code for the cell at `(gx, gy)`.
///
/// Corner weights: top-left 8, top-right 4, bottom-right 2,
/// bottom-left 1.
#[must_use]
pub fn configuration(grid: &OccupancyGrid, gx: u32, gy: u32) -> u8 {
    8 * grid.get(gx, gy)
        + 4 * grid.get(gx + 1, gy)
        + 2 * grid.get(gx + 1, gy + 1)
        + grid.get(gx, gy + 1)
}

/// Stitch contour tiles over the worker's grid-row partition.
///
/// Tile writes for cell `(gx, gy)` touch only the pixel block
/// `[gx*step, gx*step+step) x [gy*step, gy*step+step)`, so distinct row
/// partitions write disjoint image regions.
#[allow(clippy::cast_possible_truncation)]
pub fn march(
    grid: &OccupancyGrid,
    raster: &SharedRaster,
    tiles: &TileLibrary,
    grid_rows: Range<usize>,
) {
    let step = tiles.step();
    for gy in grid_rows {
        let gy = gy as u32;
        for gx in 0..grid.cols() {
            let code = configuration(grid, gx, gy);
            blit(raster, tiles.tile(code), gx * step, gy * step);
        }
    }
}

/// Copy one tile into the working image at pixel offset `(ox, oy)`,
/// overwriting whatever was there.
fn blit(raster: &SharedRaster, tile: &RgbImage, ox: u32, oy: u32) {
    for (x, y, pixel) in tile.enumerate_pixels() {
        raster.put(ox + x, oy + y, pixel.0);
    }
}

//! Pre-rendered contour tile library.
//!
//! Marching squares handles the 16 canonical 2x2 cell configurations;
//! each configuration code (0-15) selects one fixed `step x step` tile
//! that the stitcher copies into the output image. The library is
//! immutable once constructed and shared read-only by every worker.

use image::RgbImage;

use crate::types::PipelineError;

/// Number of marching-squares configurations (4 corner bits).
pub const TILE_COUNT: usize = 16;

/// Indexed set of 16 contour tiles, one per configuration code.
#[derive(Debug)]
pub struct TileLibrary {
    step: u32,
    tiles: Vec<RgbImage>,
}

impl TileLibrary {
    /// Build a library from tiles indexed by configuration code.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::TileCount`] unless exactly
    /// [`TILE_COUNT`] tiles are supplied, and
    /// [`PipelineError::TileDimensions`] if any tile is not
    /// `step x step`.
    pub fn new(tiles: Vec<RgbImage>, step: u32) -> Result<Self, PipelineError> {
        if tiles.len() != TILE_COUNT {
            return Err(PipelineError::TileCount {
                expected: TILE_COUNT,
                found: tiles.len(),
            });
        }
        for (code, tile) in tiles.iter().enumerate() {
            if tile.width() != step || tile.height() != step {
                return Err(PipelineError::TileDimensions {
                    code,
                    width: tile.width(),
                    height: tile.height(),
                    step,
                });
            }
        }
        Ok(Self { step, tiles })
    }

    /// Side length of every tile (the grid step).
    #[must_use]
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// The tile for a 4-bit configuration code.
    #[must_use]
    pub fn tile(&self, code: u8) -> &RgbImage {
        debug_assert!(usize::from(code) < TILE_COUNT, "configuration code out of range");
        &self.tiles[usize::from(code)]
    }
}

//! Contour tile library loading.
//!
//! The 16 pre-rendered tiles live in a directory as `0.ppm` … `15.ppm`,
//! one file per 4-bit configuration code. They are loaded once at
//! startup and validated against the configured grid step.

use std::path::Path;

use log::debug;
use marchline_pipeline::{PipelineConfig, TILE_COUNT, TileLibrary};

use crate::RasterIoError;
use crate::ppm::read_raster;

/// Load the contour tile library from `<dir>/<code>.ppm` for codes
/// 0 through 15.
///
/// # Errors
///
/// Returns a file or decode error for an unreadable tile, and
/// [`RasterIoError::TileLibrary`] when a tile's dimensions do not match
/// `config.step`.
pub fn load_tile_library(dir: &Path, config: &PipelineConfig) -> Result<TileLibrary, RasterIoError> {
    let mut tiles = Vec::with_capacity(TILE_COUNT);
    for code in 0..TILE_COUNT {
        tiles.push(read_raster(&dir.join(format!("{code}.ppm")))?);
    }
    debug!(
        "loaded {TILE_COUNT} contour tiles from {} at step {}",
        dir.display(),
        config.step
    );
    Ok(TileLibrary::new(tiles, config.step)?)
}

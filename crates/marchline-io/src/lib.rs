//! marchline-io: raster file I/O and contour tile loading.
//!
//! Thin collaborators around the `image` crate's PNM support: read the
//! input raster, write the composited output, and load the 16
//! pre-rendered contour tiles. All pipeline logic stays in
//! `marchline-pipeline`; this crate only moves pixels between files and
//! memory.

pub mod ppm;
pub mod tile_source;

pub use ppm::{read_raster, write_raster};
pub use tile_source::load_tile_library;

use marchline_pipeline::PipelineError;

/// Errors from reading or writing raster files.
#[derive(Debug, thiserror::Error)]
pub enum RasterIoError {
    /// The file could not be opened or created.
    #[error("raster file error: {0}")]
    Io(#[from] std::io::Error),

    /// The file's pixel data could not be decoded or encoded.
    #[error("raster format error: {0}")]
    Image(#[from] image::ImageError),

    /// The loaded tiles do not form a valid library.
    #[error("contour tile library: {0}")]
    TileLibrary(#[from] PipelineError),
}

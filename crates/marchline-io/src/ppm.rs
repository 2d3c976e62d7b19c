//! PPM raster reading and writing.
//!
//! Delegates to the `image` crate's PNM codec; any format it can decode
//! works as input, but output is always written in the PNM family so
//! the contour image round-trips through the reference tooling.

use std::path::Path;

use image::{ImageFormat, ImageReader, RgbImage};
use log::debug;

use crate::RasterIoError;

/// Read a raster file into an RGB8 image.
///
/// # Errors
///
/// Returns [`RasterIoError::Io`] when the file cannot be opened and
/// [`RasterIoError::Image`] when its contents cannot be decoded.
pub fn read_raster(path: &Path) -> Result<RgbImage, RasterIoError> {
    let image = ImageReader::open(path)?.decode()?;
    debug!(
        "read {}x{} raster from {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(image.to_rgb8())
}

/// Write an RGB8 image as a binary PPM file.
///
/// # Errors
///
/// Returns [`RasterIoError::Image`] when the file cannot be encoded or
/// written.
pub fn write_raster(image: &RgbImage, path: &Path) -> Result<(), RasterIoError> {
    image.save_with_format(path, ImageFormat::Pnm)?;
    debug!(
        "wrote {}x{} raster to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

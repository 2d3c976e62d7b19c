//! Shared working raster mutated concurrently by the worker pool.
//!
//! The working image is written by every worker during the resize and
//! march phases, each inside its own disjoint row range. The pixel
//! bytes are stored as `AtomicU8` so that sharing requires no locks and
//! no unsafe code; all accesses use `Ordering::Relaxed` because
//! cross-phase visibility is established by the phase barrier, not by
//! the atomics themselves. Within a phase no worker reads another
//! worker's writes.

use std::sync::atomic::{AtomicU8, Ordering};

use image::RgbImage;

use crate::types::Dimensions;

/// Row-major RGB8 raster with atomically accessible pixel bytes.
pub struct SharedRaster {
    width: u32,
    height: u32,
    data: Vec<AtomicU8>,
}

impl SharedRaster {
    /// Allocate a zero-filled (black) raster.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 3;
        Self {
            width,
            height,
            data: std::iter::repeat_with(|| AtomicU8::new(0)).take(len).collect(),
        }
    }

    /// Copy a decoded image into a freshly allocated shared raster.
    #[must_use]
    pub fn from_image(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.as_raw().iter().map(|&b| AtomicU8::new(b)).collect(),
        }
    }

    /// Snapshot the raster into a plain [`RgbImage`].
    ///
    /// Only meaningful after the final barrier, when every worker's
    /// writes are visible.
    #[must_use]
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(self.get(x, y)))
    }

    /// Raster width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raster dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Read the RGB triple at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [
            self.data[i].load(Ordering::Relaxed),
            self.data[i + 1].load(Ordering::Relaxed),
            self.data[i + 2].load(Ordering::Relaxed),
        ]
    }

    /// Write the RGB triple at `(x, y)`.
    pub fn put(&self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.index(x, y);
        self.data[i].store(rgb[0], Ordering::Relaxed);
        self.data[i + 1].store(rgb[1], Ordering::Relaxed);
        self.data[i + 2].store(rgb[2], Ordering::Relaxed);
    }

    /// Luminance of the pixel at `(x, y)`: the unweighted mean of the
    /// three channels, matching the reference thresholding rule.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let [r, g, b] = self.get(x, y);
        // Sum fits in u16 and the mean fits back in u8.
        ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_raster_is_black() {
        let raster = SharedRaster::new(4, 3);
        assert_eq!(raster.width(), 4);
        assert_eq!(raster.height(), 3);
        assert_eq!(raster.get(3, 2), [0, 0, 0]);
    }

    #[test]
    fn put_then_get_round_trips() {
        let raster = SharedRaster::new(4, 4);
        raster.put(1, 2, [10, 20, 30]);
        assert_eq!(raster.get(1, 2), [10, 20, 30]);
        // Neighbors untouched.
        assert_eq!(raster.get(2, 2), [0, 0, 0]);
        assert_eq!(raster.get(1, 1), [0, 0, 0]);
    }

    #[test]
    fn from_image_preserves_pixels() {
        let img = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 7]));
        let raster = SharedRaster::from_image(&img);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(raster.get(x, y), [x as u8, y as u8, 7]);
            }
        }
    }

    #[test]
    fn to_image_round_trips() {
        let img = RgbImage::from_fn(5, 4, |x, y| image::Rgb([(x * 7) as u8, (y * 11) as u8, 42]));
        let raster = SharedRaster::from_image(&img);
        assert_eq!(raster.to_image(), img);
    }

    #[test]
    fn luminance_is_channel_mean() {
        let raster = SharedRaster::new(1, 1);
        raster.put(0, 0, [30, 60, 90]);
        assert_eq!(raster.luminance(0, 0), 60);
    }

    #[test]
    fn luminance_truncates_like_integer_division() {
        let raster = SharedRaster::new(1, 1);
        raster.put(0, 0, [1, 1, 0]);
        assert_eq!(raster.luminance(0, 0), 0);
        raster.put(0, 0, [255, 255, 255]);
        assert_eq!(raster.luminance(0, 0), 255);
    }
}

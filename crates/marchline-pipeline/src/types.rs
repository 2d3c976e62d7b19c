//! Shared types for the marchline contour pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `RgbImage` so downstream crates can reference raster data
/// without depending on `image` directly.
pub use image::RgbImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an in-memory raster.
    #[must_use]
    pub fn of(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Whether this raster fits inside `other` along both axes.
    #[must_use]
    pub const fn fits_within(self, other: Self) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

/// Errors that can occur while assembling or running the pipeline.
///
/// All variants are detected before any worker thread is spawned: the
/// parallel phases themselves are infallible by construction (disjoint
/// write ranges over pre-allocated buffers).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// The worker count was zero.
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// The input image has a zero dimension.
    #[error("input image is empty")]
    EmptyImage,

    /// The contour tile library does not hold one tile per configuration.
    #[error("contour tile library must hold exactly {expected} tiles, found {found}")]
    TileCount {
        /// Required tile count (one per 4-bit configuration).
        expected: usize,
        /// Tiles actually supplied.
        found: usize,
    },

    /// A contour tile does not match the configured grid step.
    #[error("contour tile {code} is {width}x{height}, expected {step}x{step}")]
    TileDimensions {
        /// Configuration code of the offending tile.
        code: usize,
        /// Actual tile width.
        width: u32,
        /// Actual tile height.
        height: u32,
        /// Expected side length (the grid step).
        step: u32,
    },
}

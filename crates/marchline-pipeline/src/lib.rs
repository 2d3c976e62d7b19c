//! marchline-pipeline: barrier-synchronized parallel marching squares (sans-IO).
//!
//! Extracts contour lines from a raster image by building a binary
//! occupancy grid and stitching pre-rendered contour tiles over it,
//! with the work split across a fixed pool of OS threads:
//! resize -> grid sampling + boundary fix-up -> march.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! rasters and returns the composited image. File reading/writing and
//! tile-library loading live in `marchline-io`.
//!
//! # Concurrency model
//!
//! Workers traverse the identical phase sequence in lockstep, separated
//! by full-barrier waits. The only shared mutable state is the working
//! raster and the occupancy grid; both are partitioned so each worker
//! writes a disjoint index range per phase (see [`partition`]), which
//! is what makes the run lock-free and deterministic for any worker
//! count.

pub mod config;
pub mod grid;
pub mod partition;
pub mod pipeline;
pub mod raster;
pub mod sample;
pub mod stitch;
pub mod tiles;
pub mod types;

pub use config::PipelineConfig;
pub use pipeline::extract;
pub use sample::{Resampler, ResamplerKind};
pub use tiles::{TILE_COUNT, TileLibrary};
pub use types::{Dimensions, PipelineError, RgbImage};

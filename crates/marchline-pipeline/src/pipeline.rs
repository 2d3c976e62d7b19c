//! Barrier-synchronized parallel pipeline coordinator.
//!
//! Owns the shared buffers, spawns a fixed pool of worker threads, and
//! drives the phase protocol: resize, grid sampling plus boundary
//! fix-up, march. Every worker executes the identical phase sequence,
//! differentiated only by its statically assigned index ranges; a
//! single `std::sync::Barrier` rendezvous separates the phases, and the
//! scope join is the final rendezvous before the output snapshot.
//!
//! All writes a worker performs during phase *n* are visible to every
//! worker in phase *n+1* by virtue of the barrier. Within a phase,
//! workers only touch their own partition, so no ordering is needed
//! beyond that.

use std::sync::{Barrier, PoisonError, RwLock};

use image::RgbImage;
use log::{debug, info};

use crate::config::PipelineConfig;
use crate::grid::OccupancyGrid;
use crate::partition::block_range;
use crate::raster::SharedRaster;
use crate::sample::Resampler;
use crate::tiles::TileLibrary;
use crate::types::{Dimensions, PipelineError};

/// Everything one worker needs: shared buffers by reference, plus its
/// identity and role. The leader flag designates the worker that
/// performs the singleton actions (sentinel write, source release);
/// it is part of the worker's configuration, not inferred ad hoc.
struct WorkerContext<'a> {
    id: usize,
    count: usize,
    leader: bool,
    barrier: &'a Barrier,
    /// Original image slot; emptied by the leader after the resize
    /// barrier so the large source buffer is released while the rest of
    /// the pipeline runs. `None` from the start when no resample is
    /// needed (the working raster already holds the pixels).
    source: &'a RwLock<Option<RgbImage>>,
    scaled: &'a SharedRaster,
    grid: &'a OccupancyGrid,
    tiles: &'a TileLibrary,
    config: &'a PipelineConfig,
    resample: bool,
}

/// Run the full contour extraction pipeline and return the composited
/// output image.
///
/// Decides once, before spawning workers, whether the source needs
/// resampling: a source within `config.max_width x max_height` becomes
/// the working image as-is, otherwise the working image is allocated at
/// exactly the cap and every worker participates in resampling it.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] for a bad configuration or
/// a tile library whose tile size disagrees with `config.step`,
/// [`PipelineError::NoWorkers`] when `workers` is zero, and
/// [`PipelineError::EmptyImage`] for a zero-sized source. All errors
/// are detected before any thread is spawned.
pub fn extract(
    source: RgbImage,
    tiles: &TileLibrary,
    config: &PipelineConfig,
    workers: usize,
) -> Result<RgbImage, PipelineError> {
    config.validate()?;
    if workers == 0 {
        return Err(PipelineError::NoWorkers);
    }
    if source.width() == 0 || source.height() == 0 {
        return Err(PipelineError::EmptyImage);
    }
    if tiles.step() != config.step {
        return Err(PipelineError::InvalidConfig(format!(
            "tile library step {} does not match configured step {}",
            tiles.step(),
            config.step
        )));
    }

    let source_dims = Dimensions::of(&source);
    let resample = !source_dims.fits_within(config.max_dimensions());

    let (scaled, source_slot) = if resample {
        info!(
            "resampling {}x{} source down to {}x{}",
            source_dims.width, source_dims.height, config.max_width, config.max_height
        );
        (
            SharedRaster::new(config.max_width, config.max_height),
            RwLock::new(Some(source)),
        )
    } else {
        debug!(
            "source {}x{} fits the cap, skipping resample",
            source_dims.width, source_dims.height
        );
        let scaled = SharedRaster::from_image(&source);
        // The working raster already holds the pixels; only one image
        // buffer needs to outlive this point.
        drop(source);
        (scaled, RwLock::new(None))
    };

    let grid = OccupancyGrid::new(scaled.dimensions(), config.step);
    let barrier = Barrier::new(workers);
    debug!(
        "spawning {workers} workers over a {}x{} cell grid",
        grid.cols(),
        grid.rows()
    );

    std::thread::scope(|s| {
        for id in 0..workers {
            let context = WorkerContext {
                id,
                count: workers,
                leader: id == 0,
                barrier: &barrier,
                source: &source_slot,
                scaled: &scaled,
                grid: &grid,
                tiles,
                config,
                resample,
            };
            s.spawn(move || run_worker(&context));
        }
    });

    Ok(scaled.to_image())
}

/// The phase sequence every worker traverses in lockstep.
fn run_worker(ctx: &WorkerContext<'_>) {
    // Phase 1: resize. Skipped entirely (including its barrier) when the
    // source already fits the cap.
    if ctx.resample {
        resample_rows(ctx);
        ctx.barrier.wait();
        if ctx.leader {
            // The working raster is fully populated; release the large
            // source buffer while the remaining phases run.
            drop(write_lock(ctx.source).take());
            debug!("worker {}: released source image", ctx.id);
        }
    }

    // Phase 2: occupancy grid. Interior sampling, boundary fix-up, and
    // the leader's sentinel write share one barrier epoch; their write
    // sets are disjoint and nothing reads a cell until after the
    // barrier below.
    let grid_rows = block_range(ctx.grid.rows() as usize, ctx.id, ctx.count);
    ctx.grid.sample_interior(
        ctx.scaled,
        ctx.config.step,
        ctx.config.threshold,
        grid_rows.clone(),
    );
    let last_row_cols = block_range(ctx.grid.cols() as usize, ctx.id, ctx.count);
    ctx.grid.fix_boundary(
        ctx.scaled,
        ctx.config.step,
        ctx.config.threshold,
        last_row_cols,
        grid_rows.clone(),
    );
    if ctx.leader {
        ctx.grid.write_sentinel();
    }
    ctx.barrier.wait();

    // Phase 3: march. Reads cells written by other workers in phase 2;
    // the barrier above is what makes those reads sound.
    crate::stitch::march(ctx.grid, ctx.scaled, ctx.tiles, grid_rows);

    // Final rendezvous is the scope join in `extract`.
}

/// Resample the worker's partition of working-image rows from the
/// source via the configured kernel.
#[allow(clippy::cast_possible_truncation)]
fn resample_rows(ctx: &WorkerContext<'_>) {
    let guard = read_lock(ctx.source);
    let Some(source) = guard.as_ref() else {
        // Unreachable by construction: the slot is populated exactly
        // when `resample` is set.
        return;
    };
    let rows = block_range(ctx.scaled.height() as usize, ctx.id, ctx.count);
    let inv_w = 1.0 / f64::from(ctx.scaled.width() - 1);
    let inv_h = 1.0 / f64::from(ctx.scaled.height() - 1);
    for y in rows {
        let y = y as u32;
        let v = f64::from(y) * inv_h;
        for x in 0..ctx.scaled.width() {
            let u = f64::from(x) * inv_w;
            let rgb = ctx.config.resampler.sample(source, u, v);
            ctx.scaled.put(x, y, rgb);
        }
    }
}

/// Read-lock the source slot, ignoring poisoning: a poisoned lock only
/// means another worker panicked, and this batch run is already doomed.
fn read_lock<'a>(
    slot: &'a RwLock<Option<RgbImage>>,
) -> std::sync::RwLockReadGuard<'a, Option<RgbImage>> {
    slot.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write-lock the source slot; see [`read_lock`] on poisoning.
fn write_lock<'a>(
    slot: &'a RwLock<Option<RgbImage>>,
) -> std::sync::RwLockWriteGuard<'a, Option<RgbImage>> {
    slot.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tiles::TILE_COUNT;

    fn coded_tiles(step: u32) -> TileLibrary {
        let tiles = (0..TILE_COUNT)
            .map(|code| RgbImage::from_pixel(step, step, image::Rgb([code as u8, 0, 0])))
            .collect();
        TileLibrary::new(tiles, step).unwrap()
    }

    fn white_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]))
    }

    #[test]
    fn zero_workers_is_rejected() {
        let tiles = coded_tiles(8);
        let result = extract(white_image(16, 16), &tiles, &PipelineConfig::default(), 0);
        assert!(matches!(result, Err(PipelineError::NoWorkers)));
    }

    #[test]
    fn empty_image_is_rejected() {
        let tiles = coded_tiles(8);
        let result = extract(RgbImage::new(0, 0), &tiles, &PipelineConfig::default(), 2);
        assert!(matches!(result, Err(PipelineError::EmptyImage)));
    }

    #[test]
    fn tile_step_mismatch_is_rejected() {
        let tiles = coded_tiles(4);
        let result = extract(white_image(16, 16), &tiles, &PipelineConfig::default(), 2);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn invalid_config_is_rejected_before_spawning() {
        let tiles = coded_tiles(0);
        let config = PipelineConfig {
            step: 0,
            ..PipelineConfig::default()
        };
        let result = extract(white_image(16, 16), &tiles, &config, 2);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn white_input_composites_tile_zero_everywhere() {
        // All-white input, step 8: every cell is background, every
        // configuration code is 0, and the whole 16x16 output is tile 0.
        let tiles = coded_tiles(8);
        let output = extract(white_image(16, 16), &tiles, &PipelineConfig::default(), 2)
            .unwrap();
        assert_eq!(output.dimensions(), (16, 16));
        for pixel in output.pixels() {
            assert_eq!(pixel.0, [0, 0, 0]);
        }
    }

    #[test]
    fn small_input_keeps_its_dimensions() {
        let tiles = coded_tiles(8);
        let output = extract(white_image(40, 24), &tiles, &PipelineConfig::default(), 3)
            .unwrap();
        assert_eq!(output.dimensions(), (40, 24));
    }

    #[test]
    fn oversized_input_is_resampled_to_the_cap() {
        let tiles = coded_tiles(8);
        let config = PipelineConfig {
            max_width: 32,
            max_height: 32,
            ..PipelineConfig::default()
        };
        let output = extract(white_image(64, 48), &tiles, &config, 2).unwrap();
        assert_eq!(output.dimensions(), (32, 32));
    }

    #[test]
    fn worker_count_does_not_change_output() {
        // Parallelism must not change results: compare every worker
        // count against the single-worker baseline, byte for byte.
        let tiles = coded_tiles(8);
        let config = PipelineConfig::default();
        let source = RgbImage::from_fn(48, 40, |x, y| {
            let v = ((x * 13 + y * 29) % 251) as u8;
            image::Rgb([v, v.wrapping_mul(3), v.wrapping_add(90)])
        });

        let baseline = extract(source.clone(), &tiles, &config, 1).unwrap();
        for workers in 2..=5 {
            let output = extract(source.clone(), &tiles, &config, workers).unwrap();
            assert_eq!(
                output.as_raw(),
                baseline.as_raw(),
                "output differs with {workers} workers"
            );
        }
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let tiles = coded_tiles(8);
        let config = PipelineConfig {
            max_width: 32,
            max_height: 32,
            ..PipelineConfig::default()
        };
        // Oversized source exercises the resample phase too.
        let source = RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        });
        let first = extract(source.clone(), &tiles, &config, 4).unwrap();
        let second = extract(source, &tiles, &config, 4).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn more_workers_than_grid_rows_is_fine() {
        let tiles = coded_tiles(8);
        // 16x16 at step 8 gives a 2x2 cell grid; 8 workers leave most
        // partitions empty, and those workers must still rendezvous.
        let output = extract(white_image(16, 16), &tiles, &PipelineConfig::default(), 8)
            .unwrap();
        assert_eq!(output.dimensions(), (16, 16));
    }
}

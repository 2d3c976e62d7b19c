//! marchline: extract contour lines from a raster image with a fixed
//! pool of barrier-synchronized worker threads.

use std::path::PathBuf;

use clap::Parser;
use log::info;
use marchline_io::{load_tile_library, read_raster, write_raster};
use marchline_pipeline::{PipelineConfig, ResamplerKind, extract};

/// Extract marching-squares contour lines from a raster image.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input raster path.
    input: PathBuf,

    /// Output raster path (written as binary PPM).
    output: PathBuf,

    /// Number of worker threads.
    workers: usize,

    /// Grid step in pixels (contour tile side length).
    #[arg(long, default_value_t = PipelineConfig::default().step)]
    step: u32,

    /// Luminance threshold separating foreground from background.
    #[arg(long, default_value_t = PipelineConfig::default().threshold)]
    threshold: u8,

    /// Maximum working-image width before resampling kicks in.
    #[arg(long, default_value_t = PipelineConfig::default().max_width)]
    max_width: u32,

    /// Maximum working-image height before resampling kicks in.
    #[arg(long, default_value_t = PipelineConfig::default().max_height)]
    max_height: u32,

    /// Directory holding the 16 contour tiles (0.ppm through 15.ppm).
    #[arg(long, default_value = "contours")]
    tiles: PathBuf,

    /// Resampling kernel: "catmull-rom" or "nearest".
    #[arg(long, value_parser = parse_resampler, default_value = "catmull-rom")]
    resampler: ResamplerKind,
}

fn parse_resampler(s: &str) -> Result<ResamplerKind, String> {
    match s {
        "catmull-rom" | "bicubic" => Ok(ResamplerKind::CatmullRom),
        "nearest" => Ok(ResamplerKind::Nearest),
        other => Err(format!(
            "unknown resampler '{other}' (expected 'catmull-rom' or 'nearest')"
        )),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = PipelineConfig {
        step: args.step,
        threshold: args.threshold,
        max_width: args.max_width,
        max_height: args.max_height,
        resampler: args.resampler,
    };

    let source = read_raster(&args.input)?;
    info!(
        "read {}x{} raster from {}",
        source.width(),
        source.height(),
        args.input.display()
    );

    let tiles = load_tile_library(&args.tiles, &config)?;

    let output = extract(source, &tiles, &config, args.workers)?;
    write_raster(&output, &args.output)?;
    info!(
        "wrote {}x{} contour image to {}",
        output.width(),
        output.height(),
        args.output.display()
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::parse_from(["marchline", "in.ppm", "out.ppm", "4"]);
        assert_eq!(args.workers, 4);
        assert_eq!(args.step, 8);
        assert_eq!(args.threshold, 200);
        assert_eq!(args.max_width, 2048);
        assert_eq!(args.max_height, 2048);
        assert_eq!(args.tiles, PathBuf::from("contours"));
        assert_eq!(args.resampler, ResamplerKind::CatmullRom);
    }

    #[test]
    fn args_parse_with_overrides() {
        let args = Args::parse_from([
            "marchline",
            "a.ppm",
            "b.ppm",
            "2",
            "--step",
            "4",
            "--threshold",
            "128",
            "--tiles",
            "tiles",
            "--resampler",
            "nearest",
        ]);
        assert_eq!(args.step, 4);
        assert_eq!(args.threshold, 128);
        assert_eq!(args.tiles, PathBuf::from("tiles"));
        assert_eq!(args.resampler, ResamplerKind::Nearest);
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(Args::try_parse_from(["marchline", "in.ppm"]).is_err());
    }

    #[test]
    fn unknown_resampler_is_rejected() {
        let result = Args::try_parse_from([
            "marchline",
            "a.ppm",
            "b.ppm",
            "1",
            "--resampler",
            "lanczos",
        ]);
        assert!(result.is_err());
    }
}

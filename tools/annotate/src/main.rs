//! Map annotation tool.
//!
//! Annotates a large raster map with points of interest, labels, and
//! smoothed nation borders, then writes the composite (and optionally a
//! tile grid) to disk. One-shot batch run: any fatal condition aborts
//! before output is written.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rusttype::Font;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use map_common::{AnnotateError, Dataset};
use map_render::dpi::{detect_dpi, DEFAULT_DPI};
use map_render::export::{export_tiles, save_image, OutputFormat};
use map_render::{render_map, AnnotationAssets, RenderConfig};

#[derive(Parser, Debug)]
#[command(name = "annotate")]
#[command(about = "Annotate a large map with POIs, labels, and nation borders")]
struct Args {
    /// Directory containing the map image, font, icons, and POI dataset
    #[arg(long, default_value = ".")]
    assets_dir: PathBuf,

    /// Map image filename
    #[arg(long, default_value = "map.jpg")]
    map: String,

    /// Font filename
    #[arg(long, default_value = "HyliaSerifBeta-Regular.otf")]
    font: String,

    /// Portal stone icon filename
    #[arg(long, default_value = "portal_stone.png")]
    portal_icon: String,

    /// Stedding icon filename
    #[arg(long, default_value = "stedding.png")]
    stedding_icon: String,

    /// POI dataset filename
    #[arg(long, default_value = "poi.json")]
    dataset: String,

    /// Output basename, without extension
    #[arg(long, default_value = "map_annotated")]
    out: String,

    /// Output format
    #[arg(long, value_parser = ["jpg", "png"], default_value = "jpg")]
    format: String,

    /// JPEG quality (ignored for png)
    #[arg(long, default_value_t = 90)]
    quality: u8,

    /// Output downscale factor (e.g. 0.5 for half size)
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Tile size for tiled export (0 disables tiling)
    #[arg(long, default_value_t = 0)]
    tile_size: u32,

    /// Render nation borders
    #[arg(long)]
    nation_borders: bool,

    /// Spline samples per segment for border smoothing
    #[arg(long, default_value_t = 10)]
    spline_samples: u32,

    /// Supersampling factor for borders (1 = off, 2 or 3 for smoother lines)
    #[arg(long, default_value_t = 1)]
    aa_scale: u32,

    /// Log level
    #[arg(long, default_value = "info", env = "ANNOTATE_LOG")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let format = match args.format.as_str() {
        "png" => OutputFormat::Png,
        _ => OutputFormat::Jpeg,
    };

    // Load every asset up front; a missing or unreadable asset aborts the
    // run before any output exists.
    let map_path = args.assets_dir.join(&args.map);
    let map_bytes = std::fs::read(&map_path).map_err(|e| AnnotateError::AssetRead {
        path: map_path.display().to_string(),
        message: e.to_string(),
    })?;
    let base = image::load_from_memory(&map_bytes)
        .map_err(|e| AnnotateError::ImageDecode {
            path: map_path.display().to_string(),
            message: e.to_string(),
        })?
        .to_rgba8();

    let dpi = detect_dpi(&map_bytes).unwrap_or(DEFAULT_DPI);
    info!(dpi, width = base.width(), height = base.height(), "map loaded");

    let font = load_font(&args.assets_dir.join(&args.font))?;
    let portal_icon = load_icon(&args.assets_dir.join(&args.portal_icon))?;
    let stedding_icon = load_icon(&args.assets_dir.join(&args.stedding_icon))?;

    let dataset_path = args.assets_dir.join(&args.dataset);
    let dataset = Dataset::from_file(
        dataset_path
            .to_str()
            .with_context(|| format!("non-UTF8 dataset path {}", dataset_path.display()))?,
    )?;
    info!(
        portal_stones = dataset.portal_stones.len(),
        steddings = dataset.steddings.len(),
        rivers = dataset.rivers.len(),
        nations = dataset.nations.len(),
        "dataset loaded"
    );

    let assets = AnnotationAssets {
        font,
        portal_icon,
        stedding_icon,
        dpi,
    };
    let config = RenderConfig {
        output_scale: args.scale,
        supersample: args.aa_scale,
        spline_samples: args.spline_samples,
        draw_borders: args.nation_borders,
        ..RenderConfig::default()
    };

    let canvas = render_map(base, &dataset, &assets, &config)?;

    // Main composite artifact.
    let out_path = PathBuf::from(format!("{}.{}", args.out, format.extension()));
    save_image(&canvas, &out_path, format, args.quality, Some(dpi))?;
    println!(
        "Saved {} ({}x{})",
        out_path.display(),
        canvas.width(),
        canvas.height()
    );

    // Optional tile grid, cut from the final composite.
    if args.tile_size > 0 {
        let tiles_dir = PathBuf::from(format!("{}_tiles_{}", args.out, args.tile_size));
        let count = export_tiles(
            &canvas,
            args.tile_size,
            &tiles_dir,
            &args.out,
            format,
            args.quality,
            Some(dpi),
        )?;
        println!("Exported {} tiles to {}", count, tiles_dir.display());
    }

    Ok(())
}

fn load_font(path: &Path) -> Result<Font<'static>> {
    let bytes = std::fs::read(path).map_err(|e| AnnotateError::AssetRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let font = Font::try_from_vec(bytes)
        .ok_or_else(|| AnnotateError::FontLoad(path.display().to_string()))?;
    Ok(font)
}

fn load_icon(path: &Path) -> Result<image::RgbaImage> {
    let icon = image::open(path).map_err(|e| AnnotateError::ImageDecode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(icon.to_rgba8())
}

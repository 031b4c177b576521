//! Export stage: image encoding and tile partitioning.
//!
//! Two encodings are supported:
//! - **PNG** (lossless, alpha preserved): written by hand: signature,
//!   IHDR, an optional `pHYs` chunk carrying the detected DPI, a
//!   zlib-compressed IDAT, IEND.
//! - **JPEG** (lossy, quality-configurable): alpha is dropped outright,
//!   not matted against a background. The encoder writes full-resolution
//!   chroma and performs no extra optimization passes, trading file size
//!   for text and line edge sharpness.

use std::io::Write;
use std::path::Path;

use image::{codecs::jpeg::JpegEncoder, imageops, ColorType, Rgb, RgbImage, RgbaImage};
use map_common::{AnnotateError, AnnotateResult, TileGrid};
use tracing::info;

/// Output encoding for the composite and its tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// File extension used in artifact names.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

const INCHES_PER_METRE: f64 = 0.0254;

/// Encode an RGBA image as a PNG, preserving alpha.
///
/// When `dpi` is given, a `pHYs` chunk records it (in pixels per metre) so
/// downstream consumers see the same print resolution as the base image.
pub fn encode_png(img: &RgbaImage, dpi: Option<f64>) -> AnnotateResult<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&width.to_be_bytes());
    ihdr_data.extend_from_slice(&height.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // pHYs chunk (print resolution), before IDAT per the PNG spec
    if let Some(dpi) = dpi {
        let ppm = (dpi / INCHES_PER_METRE).round() as u32;
        let mut phys_data = Vec::with_capacity(9);
        phys_data.extend_from_slice(&ppm.to_be_bytes());
        phys_data.extend_from_slice(&ppm.to_be_bytes());
        phys_data.push(1); // unit: metre
        write_chunk(&mut png, b"pHYs", &phys_data);
    }

    // IDAT chunk (image data)
    let idat_data = deflate_idat_rgba(img.as_raw(), width as usize, height as usize)
        .map_err(|e| AnnotateError::Encode(format!("IDAT compression failed: {e}")))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk: length, type, data, CRC.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGBA scanlines for the IDAT chunk (filter type 0 per row).
fn deflate_idat_rgba(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + width * 4));
    for y in 0..height {
        uncompressed.push(0); // filter type: none
        let row_start = y * width * 4;
        uncompressed.extend_from_slice(&pixels[row_start..row_start + width * 4]);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

/// Encode an RGBA image as a JPEG at the given quality.
///
/// The alpha channel is removed, not composited; the `image` JPEG encoder
/// writes every component at full resolution (no chroma subsampling).
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> AnnotateResult<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut rgb = RgbImage::new(width, height);
    for (src, dst) in img.pixels().zip(rgb.pixels_mut()) {
        *dst = Rgb([src.0[0], src.0[1], src.0[2]]);
    }

    let mut jpeg_data = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg_data, quality.clamp(1, 100));
    encoder
        .encode(rgb.as_raw(), width, height, ColorType::Rgb8)
        .map_err(|e| AnnotateError::Encode(format!("JPEG encoding failed: {e}")))?;

    Ok(jpeg_data)
}

/// Encode and write one image artifact.
pub fn save_image(
    img: &RgbaImage,
    path: &Path,
    format: OutputFormat,
    quality: u8,
    dpi: Option<f64>,
) -> AnnotateResult<()> {
    let bytes = match format {
        OutputFormat::Png => encode_png(img, dpi)?,
        OutputFormat::Jpeg => encode_jpeg(img, quality)?,
    };
    std::fs::write(path, bytes).map_err(|e| AnnotateError::OutputWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Partition the final canvas into a tile grid and write every tile.
///
/// Pure partition: tile pixel content is cropped from the already-rendered
/// canvas, never re-rendered. Returns the number of tiles written.
pub fn export_tiles(
    img: &RgbaImage,
    tile_size: u32,
    out_dir: &Path,
    base_name: &str,
    format: OutputFormat,
    quality: u8,
    dpi: Option<f64>,
) -> AnnotateResult<u32> {
    let grid = TileGrid::new(img.width(), img.height(), tile_size);
    std::fs::create_dir_all(out_dir).map_err(|e| AnnotateError::OutputWrite {
        path: out_dir.display().to_string(),
        message: e.to_string(),
    })?;

    info!(
        cols = grid.cols(),
        rows = grid.rows(),
        tile_size,
        "exporting tile grid"
    );

    for (col, row) in grid.tiles() {
        let (x, y, w, h) = grid.tile_rect(col, row);
        let tile = imageops::crop_imm(img, x, y, w, h).to_image();
        let path = out_dir.join(grid.tile_name(base_name, col, row, format.extension()));
        save_image(&tile, &path, format, quality, dpi)?;
    }

    Ok(grid.tile_count())
}

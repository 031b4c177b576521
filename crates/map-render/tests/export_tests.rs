//! Tests for the export stage: encoders and tile partitioning.

use image::{Rgba, RgbaImage};
use map_render::export::{
    encode_jpeg, encode_png, export_tiles, save_image, OutputFormat, DEFAULT_JPEG_QUALITY,
};

/// Gradient test image with many colors and varying alpha.
fn test_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 7 % 256) as u8,
            (y * 13 % 256) as u8,
            ((x + y) * 3 % 256) as u8,
            (200 + (x % 56)) as u8,
        ])
    })
}

// ============================================================================
// PNG encoding
// ============================================================================

#[test]
fn test_png_roundtrip_preserves_alpha() {
    let img = test_image(31, 17);
    let png = encode_png(&img, None).unwrap();

    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (31, 17));
    assert_eq!(decoded, img);
}

#[test]
fn test_png_ihdr_dimensions() {
    let img = test_image(300, 44);
    let png = encode_png(&img, None).unwrap();

    // IHDR is the first chunk: length(4) type(4) then 13 data bytes.
    assert_eq!(&png[12..16], b"IHDR");
    let w = u32::from_be_bytes(png[16..20].try_into().unwrap());
    let h = u32::from_be_bytes(png[20..24].try_into().unwrap());
    assert_eq!((w, h), (300, 44));
    assert_eq!(png[24], 8); // bit depth
    assert_eq!(png[25], 6); // color type RGBA
}

#[test]
fn test_png_phys_chunk_carries_dpi() {
    let img = test_image(8, 8);
    let png = encode_png(&img, Some(300.0)).unwrap();

    // pHYs sits between IHDR and IDAT.
    let pos = png
        .windows(4)
        .position(|w| w == b"pHYs")
        .expect("pHYs chunk missing");
    let ppm = u32::from_be_bytes(png[pos + 4..pos + 8].try_into().unwrap());
    assert_eq!(ppm, 11811); // round(300 / 0.0254)
    assert_eq!(png[pos + 12], 1); // unit: metre

    let idat_pos = png.windows(4).position(|w| w == b"IDAT").unwrap();
    assert!(pos < idat_pos);

    // Still a valid PNG for a real decoder.
    assert!(image::load_from_memory(&png).is_ok());
}

#[test]
fn test_png_without_dpi_has_no_phys() {
    let png = encode_png(&test_image(8, 8), None).unwrap();
    assert!(png.windows(4).all(|w| w != b"pHYs"));
}

// ============================================================================
// JPEG encoding
// ============================================================================

#[test]
fn test_jpeg_drops_alpha() {
    let img = test_image(40, 24);
    let jpeg = encode_jpeg(&img, DEFAULT_JPEG_QUALITY).unwrap();

    // JPEG SOI marker
    assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgb8);
    assert_eq!(decoded.to_rgb8().dimensions(), (40, 24));
}

#[test]
fn test_jpeg_quality_affects_size() {
    let img = test_image(120, 120);
    let high = encode_jpeg(&img, 95).unwrap();
    let low = encode_jpeg(&img, 20).unwrap();
    assert!(low.len() < high.len());
}

// ============================================================================
// Tiling
// ============================================================================

#[test]
fn test_tiles_reconstruct_canvas() {
    let img = test_image(20, 13);
    let dir = tempfile::tempdir().unwrap();

    let count = export_tiles(&img, 7, dir.path(), "map", OutputFormat::Png, 90, None).unwrap();
    assert_eq!(count, 6); // ceil(20/7) * ceil(13/7) = 3 * 2

    // Reassemble the tiles and compare against the source canvas.
    let mut reassembled = RgbaImage::new(20, 13);
    let mut total_pixels = 0u64;
    for row in 0..2u32 {
        for col in 0..3u32 {
            let name = format!("map_x{col:02}_y{row:02}.png");
            let tile = image::open(dir.path().join(name)).unwrap().to_rgba8();
            total_pixels += tile.width() as u64 * tile.height() as u64;
            for (x, y, px) in tile.enumerate_pixels() {
                reassembled.put_pixel(col * 7 + x, row * 7 + y, *px);
            }
        }
    }
    assert_eq!(total_pixels, 20 * 13);
    assert_eq!(reassembled, img);
}

#[test]
fn test_tile_names_zero_padded() {
    let img = test_image(40, 8);
    let dir = tempfile::tempdir().unwrap();

    export_tiles(&img, 8, dir.path(), "big", OutputFormat::Jpeg, 90, None).unwrap();

    assert!(dir.path().join("big_x00_y00.jpg").exists());
    assert!(dir.path().join("big_x04_y00.jpg").exists());
    assert!(!dir.path().join("big_x05_y00.jpg").exists());
}

// ============================================================================
// save_image
// ============================================================================

#[test]
fn test_save_image_writes_artifact() {
    let img = test_image(10, 10);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");

    save_image(&img, &path, OutputFormat::Png, 90, Some(96.0)).unwrap();
    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded, img);
}

#[test]
fn test_save_image_unwritable_path_fails() {
    let img = test_image(4, 4);
    let err = save_image(
        &img,
        std::path::Path::new("/nonexistent-dir/out.png"),
        OutputFormat::Png,
        90,
        None,
    );
    assert!(err.is_err());
}

//! Supersampled border rendering.
//!
//! Borders are stroked onto a transparent scratch layer at `AA` times the
//! canvas resolution with anti-aliasing disabled, then downsampled to the
//! canvas size with Lanczos resampling. The downsample is what produces
//! the anti-aliased edge: box-averaging many subpixel samples into one
//! approximates true coverage-based anti-aliasing.

use image::{imageops, Rgba, RgbaImage};
use map_common::{AnnotateError, AnnotateResult, Color, Point, BORDER_ALPHA};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

use crate::spline;

/// Density floor for spline sampling, applied after scaling by the
/// supersample factor.
pub const MIN_SAMPLES_PER_SEGMENT: u32 = 6;

/// Default border stroke width in canvas pixels.
pub const DEFAULT_BORDER_WIDTH: f32 = 5.0;

/// One national border: ordered vertices, stroke color and width.
#[derive(Debug, Clone)]
pub struct BorderPath {
    pub points: Vec<Point>,
    pub color: Color,
    pub width_px: f32,
    pub closed: bool,
}

/// Render all borders to a straight-alpha RGBA layer of `(width, height)`.
///
/// Entries with fewer than two vertices are skipped silently; they are not
/// lines. Stroke alpha is forced to [`BORDER_ALPHA`] no matter what the
/// entry's color carries.
pub fn render_border_layer(
    borders: &[BorderPath],
    width: u32,
    height: u32,
    supersample: u32,
    spline_samples: u32,
) -> AnnotateResult<RgbaImage> {
    let aa = supersample.max(1);
    let (scratch_w, scratch_h) = (width * aa, height * aa);
    debug!(scratch_w, scratch_h, aa, "allocating border scratch layer");

    let mut pixmap = Pixmap::new(scratch_w, scratch_h).ok_or_else(|| {
        AnnotateError::Render(format!(
            "cannot allocate {scratch_w}x{scratch_h} border scratch layer"
        ))
    })?;

    // Keep curve density proportional to the supersample factor so the
    // oversized stroke stays smooth.
    let samples = (spline_samples * aa).max(MIN_SAMPLES_PER_SEGMENT) as usize;

    for border in borders {
        if border.points.len() < 2 {
            continue;
        }

        let scaled: Vec<Point> = border
            .points
            .iter()
            .map(|p| p.scaled(aa as f64))
            .collect();
        let smooth = spline::catmull_rom(&scaled, samples, border.closed);

        let mut pb = PathBuilder::new();
        pb.move_to(smooth[0].x as f32, smooth[0].y as f32);
        for p in &smooth[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if border.closed {
            pb.close();
        }

        let mut paint = Paint::default();
        paint.set_color_rgba8(border.color.r, border.color.g, border.color.b, BORDER_ALPHA);
        // Hard edges here; coverage AA comes from the downsample.
        paint.anti_alias = false;

        let stroke = Stroke {
            width: border.width_px * aa as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    let layer = pixmap_to_rgba(&pixmap);
    if aa > 1 {
        Ok(imageops::resize(
            &layer,
            width,
            height,
            imageops::FilterType::Lanczos3,
        ))
    } else {
        Ok(layer)
    }
}

/// Render the border layer and alpha-composite it over the canvas.
///
/// Takes the canvas by value and returns it; pixels outside the strokes
/// are untouched.
pub fn composite_borders(
    mut canvas: RgbaImage,
    borders: &[BorderPath],
    supersample: u32,
    spline_samples: u32,
) -> AnnotateResult<RgbaImage> {
    let layer = render_border_layer(
        borders,
        canvas.width(),
        canvas.height(),
        supersample,
        spline_samples,
    )?;
    imageops::overlay(&mut canvas, &layer, 0, 0);
    Ok(canvas)
}

/// Convert a premultiplied tiny-skia pixmap to a straight-alpha image.
fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (src, dst) in pixmap.pixels().iter().zip(img.pixels_mut()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

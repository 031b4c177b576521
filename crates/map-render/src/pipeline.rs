//! The annotation pipeline.
//!
//! Each stage takes the canvas by value and returns it, so the sequential
//! dependency between stages is visible in the signatures instead of
//! hiding behind a shared mutable image: borders, then icons and labels,
//! then export (driven by the caller).

use image::{imageops, RgbaImage};
use map_common::{parse_color_spec, AnnotateError, AnnotateResult, Dataset, Point};
use rusttype::Font;
use tracing::info;

use crate::border::{self, BorderPath, DEFAULT_BORDER_WIDTH};
use crate::icons;
use crate::labels::{self, LabelStyle};

/// Immutable configuration for one render run.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output scale applied to the base image and all dataset coordinates
    /// at pipeline start. Fixed pixel constants (label offsets, stroke
    /// widths, font size) are not scaled.
    pub output_scale: f64,
    /// Supersample factor for border rendering (1 = off).
    pub supersample: u32,
    /// Spline samples per border segment before supersample scaling.
    pub spline_samples: u32,
    /// Border stroke width in canvas pixels.
    pub border_width_px: f32,
    /// Whether to render national borders at all.
    pub draw_borders: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_scale: 1.0,
            supersample: 1,
            spline_samples: 10,
            border_width_px: DEFAULT_BORDER_WIDTH,
            draw_borders: false,
        }
    }
}

impl RenderConfig {
    /// Validate configuration bounds before rendering starts.
    pub fn validate(&self) -> AnnotateResult<()> {
        if !(self.output_scale > 0.0) {
            return Err(AnnotateError::InvalidConfig(format!(
                "output scale must be positive, got {}",
                self.output_scale
            )));
        }
        if self.supersample < 1 {
            return Err(AnnotateError::InvalidConfig(
                "supersample factor must be at least 1".to_string(),
            ));
        }
        if self.spline_samples < 1 {
            return Err(AnnotateError::InvalidConfig(
                "spline samples per segment must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pre-loaded assets the annotation stages draw with.
pub struct AnnotationAssets {
    pub font: Font<'static>,
    pub portal_icon: RgbaImage,
    pub stedding_icon: RgbaImage,
    /// Print resolution of the base image (detected or defaulted).
    pub dpi: f64,
}

/// Run the full annotation pipeline over a base image.
///
/// The canvas is created once at `base size × output_scale` and its
/// dimensions never change afterwards.
pub fn render_map(
    base: RgbaImage,
    dataset: &Dataset,
    assets: &AnnotationAssets,
    config: &RenderConfig,
) -> AnnotateResult<RgbaImage> {
    config.validate()?;

    let canvas = prepare_canvas(base, config.output_scale);
    info!(
        width = canvas.width(),
        height = canvas.height(),
        scale = config.output_scale,
        "canvas prepared"
    );

    let canvas = if config.draw_borders {
        draw_borders(canvas, dataset, config)?
    } else {
        canvas
    };

    let canvas = stamp_portal_stones(canvas, dataset, assets, config.output_scale);
    let canvas = stamp_steddings(canvas, dataset, assets, config.output_scale);
    let canvas = label_rivers(canvas, dataset, assets, config.output_scale);

    Ok(canvas)
}

/// Create the canvas: the base image scaled by `output_scale`.
pub fn prepare_canvas(base: RgbaImage, output_scale: f64) -> RgbaImage {
    if output_scale == 1.0 {
        return base;
    }
    let width = ((base.width() as f64 * output_scale).round() as u32).max(1);
    let height = ((base.height() as f64 * output_scale).round() as u32).max(1);
    imageops::resize(&base, width, height, imageops::FilterType::Lanczos3)
}

/// Stage: render national borders onto the canvas.
pub fn draw_borders(
    canvas: RgbaImage,
    dataset: &Dataset,
    config: &RenderConfig,
) -> AnnotateResult<RgbaImage> {
    let borders: Vec<BorderPath> = dataset
        .nations
        .iter()
        .map(|nation| BorderPath {
            points: nation
                .border_points()
                .iter()
                .map(|p| p.scaled(config.output_scale))
                .collect(),
            color: parse_color_spec(&nation.color),
            width_px: config.border_width_px,
            closed: nation.closed,
        })
        .collect();

    info!(count = borders.len(), "rendering nation borders");
    border::composite_borders(canvas, &borders, config.supersample, config.spline_samples)
}

/// Stage: stamp portal stone icons.
pub fn stamp_portal_stones(
    mut canvas: RgbaImage,
    dataset: &Dataset,
    assets: &AnnotationAssets,
    output_scale: f64,
) -> RgbaImage {
    for stone in &dataset.portal_stones {
        icons::stamp_icon(&mut canvas, &assets.portal_icon, stone.point().scaled(output_scale));
    }
    info!(count = dataset.portal_stones.len(), "portal stones placed");
    canvas
}

/// Stage: stamp stedding icons and draw their labels.
pub fn stamp_steddings(
    mut canvas: RgbaImage,
    dataset: &Dataset,
    assets: &AnnotationAssets,
    output_scale: f64,
) -> RgbaImage {
    let icon_height = assets.stedding_icon.height();
    for stedding in &dataset.steddings {
        let center: Point = stedding.point().scaled(output_scale);
        icons::stamp_icon(&mut canvas, &assets.stedding_icon, center);
        labels::draw_label(
            &mut canvas,
            center,
            icon_height,
            &stedding.label,
            LabelStyle::Stedding,
            &assets.font,
            assets.dpi,
        );
    }
    info!(count = dataset.steddings.len(), "steddings placed");
    canvas
}

/// Stage: draw river labels.
pub fn label_rivers(
    mut canvas: RgbaImage,
    dataset: &Dataset,
    assets: &AnnotationAssets,
    output_scale: f64,
) -> RgbaImage {
    for river in &dataset.rivers {
        labels::draw_label(
            &mut canvas,
            river.point().scaled(output_scale),
            0,
            &river.label,
            LabelStyle::River,
            &assets.font,
            assets.dpi,
        );
    }
    info!(count = dataset.rivers.len(), "river labels placed");
    canvas
}

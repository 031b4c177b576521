//! Stroked text labels.
//!
//! Two label styles exist, each binding a fill color and an anchor rule.
//! Both use a white 2px outline under the fill so labels stay legible over
//! arbitrary terrain colors. The outline is drawn as offset passes of the
//! same text, which is also why measurement includes the stroke width.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use map_common::Point;
use rusttype::{Font, Scale};

/// Label font size, converted to pixels at the detected DPI.
pub const LABEL_FONT_SIZE_PT: f64 = 14.0;

/// Outline width in pixels.
pub const LABEL_STROKE_WIDTH: i32 = 2;

/// Vertical adjustment of a stedding label relative to the icon's bottom
/// edge. Negative: the label is deliberately pulled up over the icon.
/// Tuned against one specific dataset and art style; revisit before
/// reusing with other assets.
pub const STEDDING_LABEL_LIFT: i32 = -10;

/// Horizontal shift of a river label from its stated coordinate, so the
/// text does not occlude the river line itself. Same caveat as
/// [`STEDDING_LABEL_LIFT`].
pub const RIVER_LABEL_SHIFT: f64 = 50.0;

const STEDDING_FILL: Rgba<u8> = Rgba([0, 100, 0, 255]);
const RIVER_FILL: Rgba<u8> = Rgba([0, 90, 200, 255]);
const LABEL_STROKE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Convert typographic points (1/72 inch) to pixels at the given DPI.
pub fn pt_to_px(points: f64, dpi: f64) -> u32 {
    (points * dpi / 72.0).round() as u32
}

/// Label style: binds fill color and anchor rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Stedding,
    River,
}

impl LabelStyle {
    fn fill(&self) -> Rgba<u8> {
        match self {
            LabelStyle::Stedding => STEDDING_FILL,
            LabelStyle::River => RIVER_FILL,
        }
    }

    /// Font scale for this style at the given DPI.
    pub fn font_scale(&self, dpi: f64) -> Scale {
        Scale::uniform(pt_to_px(LABEL_FONT_SIZE_PT, dpi) as f32)
    }
}

/// Measure a label's visual bounding box, stroke included.
///
/// The outline widens the glyphs on every side, so centering on the bare
/// glyph metrics would sit the label off by a stroke width.
pub fn measure_label(font: &Font, scale: Scale, text: &str) -> (i32, i32) {
    let (w, h) = text_size(scale, font, text);
    (w + 2 * LABEL_STROKE_WIDTH, h + 2 * LABEL_STROKE_WIDTH)
}

/// Fill origin for a stedding label: horizontally centered on the icon
/// center, top edge at `icon_bottom + STEDDING_LABEL_LIFT`.
///
/// `measured` is the stroke-inclusive size from [`measure_label`].
pub fn stedding_label_origin(center: Point, icon_height: u32, measured: (i32, i32)) -> (i32, i32) {
    let x = (center.x - measured.0 as f64 / 2.0).round() as i32 + LABEL_STROKE_WIDTH;
    let y = (center.y + icon_height as f64 / 2.0).round() as i32 + STEDDING_LABEL_LIFT;
    (x, y)
}

/// Fill origin for a river label: the anchor is shifted right by
/// [`RIVER_LABEL_SHIFT`], then the measured box is centered on the shifted
/// point in both axes.
pub fn river_label_origin(anchor: Point, measured: (i32, i32)) -> (i32, i32) {
    let shifted_x = anchor.x + RIVER_LABEL_SHIFT;
    let x = (shifted_x - measured.0 as f64 / 2.0).round() as i32 + LABEL_STROKE_WIDTH;
    let y = (anchor.y - measured.1 as f64 / 2.0).round() as i32 + LABEL_STROKE_WIDTH;
    (x, y)
}

/// Draw `text` with its fill origin at `(x, y)`, outline beneath the fill.
pub fn draw_stroked_text(
    canvas: &mut RgbaImage,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    fill: Rgba<u8>,
) {
    let sw = LABEL_STROKE_WIDTH;
    for dy in -sw..=sw {
        for dx in -sw..=sw {
            if dx == 0 && dy == 0 {
                continue;
            }
            if dx * dx + dy * dy > sw * sw {
                continue;
            }
            draw_text_mut(canvas, LABEL_STROKE, x + dx, y + dy, scale, font, text);
        }
    }
    draw_text_mut(canvas, fill, x, y, scale, font, text);
}

/// Draw a label of the given style anchored per its rule.
///
/// For [`LabelStyle::Stedding`] the anchor is the icon center and
/// `icon_height` must be the stedding sprite height; for
/// [`LabelStyle::River`] the anchor is the dataset coordinate and
/// `icon_height` is ignored.
pub fn draw_label(
    canvas: &mut RgbaImage,
    anchor: Point,
    icon_height: u32,
    text: &str,
    style: LabelStyle,
    font: &Font,
    dpi: f64,
) {
    if text.is_empty() {
        return;
    }
    let scale = style.font_scale(dpi);
    let measured = measure_label(font, scale, text);
    let (x, y) = match style {
        LabelStyle::Stedding => stedding_label_origin(anchor, icon_height, measured),
        LabelStyle::River => river_label_origin(anchor, measured),
    };
    draw_stroked_text(canvas, x, y, text, font, scale, style.fill());
}

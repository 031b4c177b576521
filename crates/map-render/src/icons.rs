//! Center-anchored icon stamping.

use image::{imageops, RgbaImage};
use map_common::Point;

/// Top-left pixel for an icon of `(width, height)` centered at `center`,
/// rounded to the nearest integer pixel.
pub fn icon_top_left(center: Point, width: u32, height: u32) -> (i64, i64) {
    (
        (center.x - width as f64 / 2.0).round() as i64,
        (center.y - height as f64 / 2.0).round() as i64,
    )
}

/// Alpha-composite `icon` onto the canvas, centered at `center`.
///
/// The icon's own transparency is respected; placement partially off the
/// canvas is clipped.
pub fn stamp_icon(canvas: &mut RgbaImage, icon: &RgbaImage, center: Point) {
    let (x, y) = icon_top_left(center, icon.width(), icon.height());
    imageops::overlay(canvas, icon, x, y);
}

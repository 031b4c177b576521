//! Catmull-Rom spline interpolation.
//!
//! Turns a sparse ordered polyline into a dense one that passes exactly
//! through every control point, using the uniform Catmull-Rom basis.

use map_common::Point;

/// Interpolate a polyline through `points` with a Catmull-Rom spline.
///
/// The control-point sequence is padded with phantom tangent anchors: the
/// first and last points are duplicated for an open curve; a closed curve
/// wraps using the last and first two points. Each window of four padded
/// points contributes `samples_per_segment` samples for t in [0, 1), and
/// the exact terminal control point (the last point when open, the first
/// when closed) is appended once so the curve ends precisely on it.
///
/// For `n` control points the output has `(n - 1) * samples + 1` points
/// when open and `n * samples + 1` when closed.
///
/// # Arguments
/// * `points` - Ordered control points; fewer than 2 is a degenerate
///   no-op and returns the input unchanged
/// * `samples_per_segment` - Samples per control-point window, clamped to
///   at least 1
/// * `closed` - Whether the polyline wraps back to its first point
pub fn catmull_rom(points: &[Point], samples_per_segment: usize, closed: bool) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let samples = samples_per_segment.max(1);

    let mut padded = Vec::with_capacity(points.len() + 3);
    if closed {
        padded.push(points[points.len() - 1]);
        padded.extend_from_slice(points);
        padded.push(points[0]);
        padded.push(points[1]);
    } else {
        padded.push(points[0]);
        padded.extend_from_slice(points);
        padded.push(points[points.len() - 1]);
    }

    let windows = padded.len() - 3;
    let mut out = Vec::with_capacity(windows * samples + 1);
    for w in padded.windows(4) {
        let (p0, p1, p2, p3) = (w[0], w[1], w[2], w[3]);
        for j in 0..samples {
            let t = j as f64 / samples as f64;
            out.push(Point::new(
                catmull_1d(p0.x, p1.x, p2.x, p3.x, t),
                catmull_1d(p0.y, p1.y, p2.y, p3.y, t),
            ));
        }
    }

    // Sampling stops just short of t = 1 in the final window; terminate
    // the curve exactly on its endpoint.
    if closed {
        out.push(points[0]);
    } else {
        out.push(points[points.len() - 1]);
    }
    out
}

/// 1D cubic interpolation using the uniform Catmull-Rom basis.
fn catmull_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_degenerate_inputs_unchanged() {
        assert!(catmull_rom(&[], 10, false).is_empty());

        let single = pts(&[(3.0, 4.0)]);
        assert_eq!(catmull_rom(&single, 10, false), single);
    }

    #[test]
    fn test_endpoint_fidelity() {
        let control = pts(&[(0.0, 0.0), (10.0, 5.0), (20.0, -3.0), (7.0, 7.0)]);
        let out = catmull_rom(&control, 8, false);
        assert_eq!(out[0], control[0]);
        assert_eq!(*out.last().unwrap(), *control.last().unwrap());
    }

    #[test]
    fn test_sample_count() {
        // (n - 1) * s + 1 for an open curve.
        let control = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (3.0, 1.0), (4.0, 0.0)]);
        for s in [1, 4, 12] {
            let out = catmull_rom(&control, s, false);
            assert_eq!(out.len(), (control.len() - 1) * s + 1);
        }
    }

    #[test]
    fn test_passes_through_interior_control_points() {
        // Each window starts at t = 0, which evaluates exactly to p1.
        let control = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let s = 5;
        let out = catmull_rom(&control, s, false);
        assert_eq!(out[s], control[1]);
    }

    #[test]
    fn test_closed_wraps_to_start() {
        let control = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let s = 6;
        let out = catmull_rom(&control, s, true);
        assert_eq!(out.len(), control.len() * s + 1);
        assert_eq!(out[0], control[0]);
        assert_eq!(*out.last().unwrap(), control[0]);
    }

    #[test]
    fn test_collinear_points_stay_on_line() {
        // A straight run of control points must interpolate to the same line.
        let control = pts(&[(0.0, 5.0), (10.0, 5.0), (20.0, 5.0), (30.0, 5.0)]);
        let out = catmull_rom(&control, 10, false);
        for p in out {
            assert!((p.y - 5.0).abs() < 1e-9, "point off the line: {p:?}");
        }
    }

    #[test]
    fn test_minimum_one_sample_per_segment() {
        let control = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        let out = catmull_rom(&control, 0, false);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], control[0]);
        assert_eq!(out[1], control[1]);
    }
}

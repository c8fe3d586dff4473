//! Basic SVG shapes sampled into polylines, ready for pen-up/pen-down emission.
use geo_types::{coord, LineString};
use std::f64::consts::PI;

use super::flatten::{arc_points, segment_count};

/// Full revolution, starting (and ending) at the rightmost point.
pub fn circle(cx: f64, cy: f64, r: f64, segments_per_unit: f64) -> LineString<f64> {
    let r = r.abs();
    let segments = segment_count(segments_per_unit, 2.0 * PI * r);
    arc_points(coord! {x: cx, y: cy}, r, r, 0.0, 2.0 * PI, segments)
}

/// Same as circle, with the cheap π(rx+ry) perimeter estimate.
pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64, segments_per_unit: f64) -> LineString<f64> {
    let (rx, ry) = (rx.abs(), ry.abs());
    let segments = segment_count(segments_per_unit, PI * (rx + ry));
    arc_points(coord! {x: cx, y: cy}, rx, ry, 0.0, 2.0 * PI, segments)
}

/// Sharp-cornered rectangle, closed back onto its first corner.
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> LineString<f64> {
    LineString::new(vec![
        coord! {x: x, y: y},
        coord! {x: x + width, y: y},
        coord! {x: x + width, y: y + height},
        coord! {x: x, y: y + height},
        coord! {x: x, y: y},
    ])
}

/// Resolve the effective corner radii of a rect. A missing radius borrows the
/// other one, and each is capped at half the matching side. Non-positive
/// radii count as missing.
pub fn corner_radii(width: f64, height: f64, rx: Option<f64>, ry: Option<f64>) -> (f64, f64) {
    let rx = rx.filter(|r| *r > 0.0);
    let ry = ry.filter(|r| *r > 0.0);
    let rx_eff = rx.or(ry).unwrap_or(0.0).min(width / 2.0);
    let ry_eff = ry.or(rx).unwrap_or(0.0).min(height / 2.0);
    (rx_eff, ry_eff)
}

/// Rectangle with quarter-ellipse corners. Corners run clockwise from the top
/// left; the straight edges are the gaps between consecutive corner arcs.
pub fn rounded_rect(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rx: f64,
    ry: f64,
    segments_per_unit: f64,
) -> LineString<f64> {
    let segments = segment_count(segments_per_unit, 0.25 * PI * (rx + ry));
    let corners = [
        (x + rx, y + ry, PI, 1.5 * PI),
        (x + width - rx, y + ry, 1.5 * PI, 2.0 * PI),
        (x + width - rx, y + height - ry, 0.0, 0.5 * PI),
        (x + rx, y + height - ry, 0.5 * PI, PI),
    ];
    let mut points: Vec<_> = corners
        .iter()
        .flat_map(|&(cx, cy, start, end)| {
            arc_points(coord! {x: cx, y: cy}, rx, ry, start, end, segments).0
        })
        .collect();
    points.push(coord! {x: x, y: y + ry});
    LineString::new(points)
}

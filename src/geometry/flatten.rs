//! Curve flattening: turns Béziers and elliptical arcs into polylines.
//!
//! Everything here is stateless per curve. `segments_per_unit` is the caller's
//! resolution knob; it drives both the Bézier tolerance and the arc segment count.
use geo_types::{coord, Coord, LineString};
use kurbo::{BezPath, PathEl};
use std::f64::consts::PI;

/// Béziers are flattened ten times finer than arcs for the same resolution.
pub const BEZIER_RESOLUTION_FACTOR: f64 = 10.0;

/// Upper bound on the Bézier flattening tolerance, used when the resolution is
/// zero, negative or not finite.
const MAX_TOLERANCE: f64 = 1.0e6;

/// Most segments a single curve is ever split into. Beyond this a plotter
/// cannot resolve the difference anyway.
pub const MAX_SEGMENTS: usize = 100_000;

/// Number of straight segments used to approximate a curve of `length`.
/// Between 2 and [`MAX_SEGMENTS`], whatever the resolution or the length.
pub fn segment_count(segments_per_unit: f64, length: f64) -> usize {
    let wanted = segments_per_unit * length;
    if !wanted.is_finite() {
        return 2;
    }
    (wanted.round().clamp(0.0, MAX_SEGMENTS as f64) as usize).max(2)
}

/// Maximum allowed distance between a Bézier and its polyline.
pub fn bezier_tolerance(segments_per_unit: f64) -> f64 {
    let scale = segments_per_unit * BEZIER_RESOLUTION_FACTOR;
    if scale.is_finite() && scale > 0.0 {
        (0.5 / scale).min(MAX_TOLERANCE)
    } else {
        MAX_TOLERANCE
    }
}

fn flatten_bez(path: &BezPath, to: Coord<f64>, segments_per_unit: f64) -> LineString<f64> {
    let mut points: Vec<Coord<f64>> = vec![];
    path.flatten(bezier_tolerance(segments_per_unit), |el| match el {
        PathEl::MoveTo(pt) | PathEl::LineTo(pt) => points.push(coord! {x: pt.x, y: pt.y}),
        _ => {}
    });
    // Pin the end exactly, the subdivision can leave float noise behind.
    if points.len() > 1 {
        let last = points.len() - 1;
        points[last] = to;
    } else {
        points.push(to);
    }
    LineString::new(points)
}

/// Flatten a cubic Bézier. First point is `from`, last point is `to`.
pub fn flatten_cubic(
    from: Coord<f64>,
    ctrl1: Coord<f64>,
    ctrl2: Coord<f64>,
    to: Coord<f64>,
    segments_per_unit: f64,
) -> LineString<f64> {
    let mut path = BezPath::new();
    path.move_to((from.x, from.y));
    path.curve_to((ctrl1.x, ctrl1.y), (ctrl2.x, ctrl2.y), (to.x, to.y));
    flatten_bez(&path, to, segments_per_unit)
}

/// Flatten a quadratic Bézier. First point is `from`, last point is `to`.
pub fn flatten_quadratic(
    from: Coord<f64>,
    ctrl: Coord<f64>,
    to: Coord<f64>,
    segments_per_unit: f64,
) -> LineString<f64> {
    let mut path = BezPath::new();
    path.move_to((from.x, from.y));
    path.quad_to((ctrl.x, ctrl.y), (to.x, to.y));
    flatten_bez(&path, to, segments_per_unit)
}

/// Ramanujan's approximation of an ellipse circumference.
pub fn ellipse_circumference(rx: f64, ry: f64) -> f64 {
    if rx + ry == 0.0 {
        return 0.0;
    }
    let h = (rx - ry).powi(2) / (rx + ry).powi(2);
    PI * (rx + ry) * (1.0 + (3.0 * h) / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

/// Sample an axis-aligned ellipse from `start` to `end` (radians), inclusive at
/// both ends. `segments` is clamped to at least 2.
pub fn arc_points(
    center: Coord<f64>,
    rx: f64,
    ry: f64,
    start: f64,
    end: f64,
    segments: usize,
) -> LineString<f64> {
    let segments = segments.max(2);
    LineString::new(
        (0..=segments)
            .map(|i| {
                let angle = start + (i as f64 * (end - start)) / segments as f64;
                coord! {x: center.x + rx * angle.cos(), y: center.y + ry * angle.sin()}
            })
            .collect(),
    )
}

/// An SVG `A` command in endpoint form, all coordinates absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointArc {
    pub from: Coord<f64>,
    pub to: Coord<f64>,
    pub rx: f64,
    pub ry: f64,
    /// x-axis rotation, degrees
    pub rotation: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

/// The same arc in center form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
    pub center: Coord<f64>,
    pub rx: f64,
    pub ry: f64,
    /// x-axis rotation, radians
    pub rotation: f64,
    pub start_angle: f64,
    /// Signed; positive runs towards +y ("clockwise" in a y-down document).
    pub sweep_angle: f64,
}

/// Signed angle from vector u to vector v.
fn vector_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let dot = ux * vx + uy * vy;
    let len = ux.hypot(uy) * vx.hypot(vy);
    let angle = (dot / len).clamp(-1.0, 1.0).acos();
    if ux * vy - uy * vx < 0.0 {
        -angle
    } else {
        angle
    }
}

impl EndpointArc {
    /// W3C endpoint → center conversion (SVG 1.1, appendix F.6.5).
    /// Returns None for arcs that are not ellipses at all: coincident
    /// endpoints or a zero radius.
    pub fn to_center(&self) -> Option<CenterArc> {
        let (x1, y1) = (self.from.x, self.from.y);
        let (x2, y2) = (self.to.x, self.to.y);
        if x1 == x2 && y1 == y2 {
            return None;
        }
        let (rx, ry) = (self.rx.abs(), self.ry.abs());
        if rx == 0.0 || ry == 0.0 {
            return None;
        }
        let phi = self.rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // Step 1: (x1', y1'), the start point in the ellipse frame
        let dx2 = (x1 - x2) / 2.0;
        let dy2 = (y1 - y2) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        // Step 2: enlarge radii that cannot reach both endpoints
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        let radii_scale = if lambda <= 1.0 { 1.0 } else { lambda.sqrt() };
        let rx = rx * radii_scale;
        let ry = ry * radii_scale;

        // Step 3: (cx', cy')
        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let num = rx * rx * (ry * ry) - rx * rx * (y1p * y1p) - ry * ry * (x1p * x1p);
        let den = rx * rx * (y1p * y1p) + ry * ry * (x1p * x1p);
        let coef = sign * (num / den).max(0.0).sqrt();
        let cxp = coef * ((rx * y1p) / ry);
        let cyp = coef * ((-ry * x1p) / rx);

        // Step 4: center back in user space
        let cx = cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0;

        // Step 5: start angle and sweep
        let ux = (x1p - cxp) / rx;
        let uy = (y1p - cyp) / ry;
        let vx = (-x1p - cxp) / rx;
        let vy = (-y1p - cyp) / ry;
        let start_angle = vector_angle(1.0, 0.0, ux, uy);
        let mut sweep_angle = vector_angle(ux, uy, vx, vy);
        if !self.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        } else if self.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * PI;
        }

        Some(CenterArc {
            center: coord! {x: cx, y: cy},
            rx,
            ry,
            rotation: phi,
            start_angle,
            sweep_angle,
        })
    }

    /// Flatten the arc. A zero-radius arc is a straight line to the endpoint;
    /// an arc whose endpoints coincide draws nothing (empty line string).
    pub fn flatten(&self, segments_per_unit: f64) -> LineString<f64> {
        if self.from == self.to {
            return LineString::new(vec![]);
        }
        match self.to_center() {
            Some(center_arc) => {
                let mut points = center_arc.flatten(segments_per_unit);
                // Land exactly on the endpoint the path continues from.
                if let Some(last) = points.0.last_mut() {
                    *last = self.to;
                }
                points
            }
            None => LineString::new(vec![self.from, self.to]),
        }
    }
}

impl CenterArc {
    /// Approximate arc length: the ellipse circumference scaled by the swept fraction.
    pub fn length(&self) -> f64 {
        ellipse_circumference(self.rx, self.ry) * (self.sweep_angle.abs() / (2.0 * PI))
    }

    pub fn flatten(&self, segments_per_unit: f64) -> LineString<f64> {
        let segments = segment_count(segments_per_unit, self.length());
        let raw = arc_points(
            self.center,
            self.rx,
            self.ry,
            self.start_angle,
            self.start_angle + self.sweep_angle,
            segments,
        );
        let (sin_phi, cos_phi) = self.rotation.sin_cos();
        let (cx, cy) = (self.center.x, self.center.y);
        LineString::new(
            raw.coords()
                .map(|pt| {
                    let dx = pt.x - cx;
                    let dy = pt.y - cy;
                    coord! {x: cx + (cos_phi * dx - sin_phi * dy), y: cy + (sin_phi * dx + cos_phi * dy)}
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn near(a: Coord<f64>, b: Coord<f64>, tol: f64) -> bool {
        (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol
    }

    fn half_circle(sweep: bool) -> EndpointArc {
        EndpointArc {
            from: coord! {x: 10.0, y: 0.0},
            to: coord! {x: -10.0, y: 0.0},
            rx: 10.0,
            ry: 10.0,
            rotation: 0.0,
            large_arc: false,
            sweep,
        }
    }

    #[test]
    fn test_segment_count_floor() {
        assert_eq!(segment_count(0.0, 100.0), 2);
        assert_eq!(segment_count(-3.0, 100.0), 2);
        assert_eq!(segment_count(1.0, 0.0), 2);
        assert_eq!(segment_count(f64::NAN, 10.0), 2);
        assert_eq!(segment_count(1.0, 31.4), 31);
        assert_eq!(segment_count(2.0, 10.0), 20);
    }

    #[test]
    fn test_segment_count_huge_lengths() {
        assert_eq!(segment_count(1.0, f64::INFINITY), 2);
        assert_eq!(segment_count(1.0e300, 1.0e300), 2);
        assert_eq!(segment_count(1.0, 1.0e300), MAX_SEGMENTS);
        assert_eq!(segment_count(1.0, f64::NAN), 2);
    }

    #[test]
    fn test_huge_arc_stays_bounded() {
        let arc = EndpointArc {
            from: coord! {x: 0.0, y: 0.0},
            to: coord! {x: 1.0e300, y: 0.0},
            rx: 1.0e300,
            ry: 1.0e300,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        assert!(arc.flatten(1.0).0.len() <= MAX_SEGMENTS + 1);
    }

    #[test]
    fn test_negative_radii_use_absolute_value() {
        let positive = half_circle(true);
        let negative = EndpointArc {
            rx: -10.0,
            ry: -10.0,
            ..positive
        };
        assert_eq!(negative.to_center(), positive.to_center());
        assert_eq!(negative.flatten(1.0), positive.flatten(1.0));
    }

    #[test]
    fn test_bezier_tolerance_degenerate_resolution() {
        assert_eq!(bezier_tolerance(0.0), MAX_TOLERANCE);
        assert_eq!(bezier_tolerance(-1.0), MAX_TOLERANCE);
        assert!(bezier_tolerance(1.0) < bezier_tolerance(0.5));
    }

    #[test]
    fn test_cubic_endpoints() {
        let from = coord! {x: 0.0, y: 0.0};
        let to = coord! {x: 30.0, y: 0.0};
        let line = flatten_cubic(from, coord! {x: 0.0, y: 20.0}, coord! {x: 30.0, y: 20.0}, to, 1.0);
        assert!(line.0.len() > 2);
        assert_eq!(line.0[0], from);
        assert_eq!(*line.0.last().unwrap(), to);
        // Symmetric curve peaks at 3/4 of the control height
        let peak = line.coords().map(|c| c.y).fold(f64::MIN, f64::max);
        assert!((peak - 15.0).abs() < 0.1, "peak {}", peak);
    }

    #[test]
    fn test_cubic_zero_resolution_still_reaches_end() {
        let from = coord! {x: 0.0, y: 0.0};
        let to = coord! {x: 10.0, y: 10.0};
        let line = flatten_cubic(from, coord! {x: 0.0, y: 10.0}, coord! {x: 10.0, y: 0.0}, to, 0.0);
        assert!(line.0.len() >= 2);
        assert_eq!(line.0[0], from);
        assert_eq!(*line.0.last().unwrap(), to);
    }

    #[test]
    fn test_quadratic_endpoints() {
        let from = coord! {x: 0.0, y: 0.0};
        let to = coord! {x: 20.0, y: 0.0};
        let line = flatten_quadratic(from, coord! {x: 10.0, y: 20.0}, to, 1.0);
        assert_eq!(line.0[0], from);
        assert_eq!(*line.0.last().unwrap(), to);
        let peak = line.coords().map(|c| c.y).fold(f64::MIN, f64::max);
        assert!((peak - 10.0).abs() < 0.1, "peak {}", peak);
    }

    #[test]
    fn test_half_circle_sweep_direction() {
        for (sweep, expected_y) in [(true, 10.0), (false, -10.0)] {
            let points = half_circle(sweep).flatten(1.0);
            assert!(points.0.len() >= 3);
            assert!(near(points.0[0], coord! {x: 10.0, y: 0.0}, 1e-9));
            assert!(near(*points.0.last().unwrap(), coord! {x: -10.0, y: 0.0}, 1e-9));
            let mid = points.0[(points.0.len() - 1) / 2];
            assert!(mid.x.abs() < 1.5, "mid {:?}", mid);
            assert!((mid.y - expected_y).abs() < 0.5, "mid {:?}", mid);
            assert_eq!(mid.y > 0.0, sweep);
        }
    }

    #[test]
    fn test_center_conversion() {
        let arc = half_circle(true).to_center().unwrap();
        assert!(near(arc.center, coord! {x: 0.0, y: 0.0}, 1e-9));
        assert!((arc.start_angle - 0.0).abs() < 1e-9);
        assert!((arc.sweep_angle - PI).abs() < 1e-9);
        assert!((arc.length() - PI * 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_large_arc_flag_picks_other_center() {
        let small = EndpointArc {
            from: coord! {x: 0.0, y: 0.0},
            to: coord! {x: 10.0, y: 0.0},
            rx: 10.0,
            ry: 10.0,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        let large = EndpointArc { large_arc: true, ..small };
        let c_small = small.to_center().unwrap();
        let c_large = large.to_center().unwrap();
        assert!((c_small.center.y + c_large.center.y).abs() < 1e-9);
        assert!(c_small.sweep_angle.abs() < PI);
        assert!(c_large.sweep_angle.abs() > PI);
        assert!(large.flatten(1.0).0.len() > small.flatten(1.0).0.len());
    }

    #[test]
    fn test_radii_too_small_are_enlarged() {
        let arc = EndpointArc {
            from: coord! {x: 0.0, y: 0.0},
            to: coord! {x: 100.0, y: 0.0},
            rx: 1.0,
            ry: 1.0,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        let center = arc.to_center().unwrap();
        assert!((center.rx - 50.0).abs() < 1e-9);
        assert!(near(center.center, coord! {x: 50.0, y: 0.0}, 1e-9));
    }

    #[test]
    fn test_rotated_arc_ends_on_endpoint() {
        let arc = EndpointArc {
            from: coord! {x: 5.0, y: 5.0},
            to: coord! {x: 40.0, y: 12.0},
            rx: 30.0,
            ry: 10.0,
            rotation: 30.0,
            large_arc: true,
            sweep: false,
        };
        let center = arc.to_center().unwrap();
        let raw = center.flatten(1.0);
        assert!(near(raw.0[0], arc.from, 1e-6));
        assert!(near(*raw.0.last().unwrap(), arc.to, 1e-6));
    }

    #[test]
    fn test_degenerate_arcs() {
        let zero_radius = EndpointArc { rx: 0.0, ..half_circle(true) };
        assert_eq!(
            zero_radius.flatten(1.0).0,
            vec![coord! {x: 10.0, y: 0.0}, coord! {x: -10.0, y: 0.0}]
        );
        let nowhere = EndpointArc { to: coord! {x: 10.0, y: 0.0}, ..half_circle(true) };
        assert!(nowhere.flatten(1.0).0.is_empty());
    }

    #[test]
    fn test_arc_points_inclusive() {
        let pts = arc_points(coord! {x: 0.0, y: 0.0}, 1.0, 1.0, 0.0, PI, 0);
        assert_eq!(pts.0.len(), 3);
        assert!(near(pts.0[1], coord! {x: 0.0, y: 1.0}, 1e-9));
    }

    #[test]
    fn test_circumference() {
        assert!((ellipse_circumference(10.0, 10.0) - 2.0 * PI * 10.0).abs() < 1e-9);
        // a=10 b=5 is about 48.4422
        assert!((ellipse_circumference(10.0, 5.0) - 48.4422).abs() < 1e-3);
        assert_eq!(ellipse_circumference(0.0, 0.0), 0.0);
    }
}

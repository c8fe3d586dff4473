//! Walks absolute path commands and resolves each one into a self-contained
//! [`Segment`]: the implicit start point filled in, smooth control points
//! reflected, close-path given its target.
use geo_types::coord;

use super::PathCommand;
use crate::geometry::flatten::EndpointArc;
use crate::geometry::Point2D;

/// One drawable piece of a path, in the path's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Start of a subpath; the pen travels here.
    Move(Point2D),
    Line {
        from: Point2D,
        to: Point2D,
    },
    Cubic {
        from: Point2D,
        ctrl1: Point2D,
        ctrl2: Point2D,
        to: Point2D,
    },
    Quadratic {
        from: Point2D,
        ctrl: Point2D,
        to: Point2D,
    },
    Arc(EndpointArc),
    /// Straight line back to the path's initial move-to.
    Close {
        from: Point2D,
        to: Point2D,
    },
}

impl Segment {
    /// Where this segment starts drawing from.
    pub fn start(&self) -> Point2D {
        match *self {
            Segment::Move(p) => p,
            Segment::Line { from, .. }
            | Segment::Cubic { from, .. }
            | Segment::Quadratic { from, .. }
            | Segment::Close { from, .. } => from,
            Segment::Arc(arc) => arc.from,
        }
    }
}

/// Cursor plus the control points smooth curves reflect.
#[derive(Debug, Clone, PartialEq)]
pub struct PathState {
    current: Point2D,
    initial_move: Point2D,
    /// Second control point of the previous command, only if it was C or S.
    cubic_ctrl: Option<Point2D>,
    /// Control point of the previous command, only if it was Q or T. A run of
    /// T commands keeps reflecting the point carried here.
    quad_ctrl: Option<Point2D>,
}

fn reflect(point: Point2D, about: Point2D) -> Point2D {
    coord! {x: 2.0 * about.x - point.x, y: 2.0 * about.y - point.y}
}

impl PathState {
    /// Fresh state for one path. Close-path returns to the first command's
    /// point when that is a move-to, and to the origin otherwise.
    pub fn new(commands: &[PathCommand]) -> PathState {
        let origin = coord! {x: 0.0, y: 0.0};
        let initial_move = match commands.first() {
            Some(PathCommand::MoveTo(p)) => *p,
            _ => origin,
        };
        PathState {
            current: origin,
            initial_move,
            cubic_ctrl: None,
            quad_ctrl: None,
        }
    }

    /// Resolve the next command against the state and advance it.
    pub fn resolve(&mut self, command: &PathCommand) -> Segment {
        let from = self.current;
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;
        let segment = match *command {
            PathCommand::MoveTo(to) => Segment::Move(to),
            PathCommand::LineTo(to) => Segment::Line { from, to },
            PathCommand::HorizontalLineTo(x) => Segment::Line {
                from,
                to: coord! {x: x, y: from.y},
            },
            PathCommand::VerticalLineTo(y) => Segment::Line {
                from,
                to: coord! {x: from.x, y: y},
            },
            PathCommand::CubicCurveTo { ctrl1, ctrl2, end } => {
                cubic_ctrl = Some(ctrl2);
                Segment::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to: end,
                }
            }
            PathCommand::SmoothCubicCurveTo { ctrl2, end } => {
                let ctrl1 = self
                    .cubic_ctrl
                    .map(|prev| reflect(prev, from))
                    .unwrap_or(from);
                cubic_ctrl = Some(ctrl2);
                Segment::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to: end,
                }
            }
            PathCommand::QuadraticCurveTo { ctrl, end } => {
                quad_ctrl = Some(ctrl);
                Segment::Quadratic { from, ctrl, to: end }
            }
            PathCommand::SmoothQuadraticCurveTo(end) => {
                let ctrl = self
                    .quad_ctrl
                    .map(|prev| reflect(prev, from))
                    .unwrap_or(from);
                quad_ctrl = Some(ctrl);
                Segment::Quadratic { from, ctrl, to: end }
            }
            PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                end,
            } => Segment::Arc(EndpointArc {
                from,
                to: end,
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
            }),
            PathCommand::ClosePath => Segment::Close {
                from,
                to: self.initial_move,
            },
        };
        self.current = match segment {
            Segment::Move(p) => p,
            Segment::Line { to, .. }
            | Segment::Cubic { to, .. }
            | Segment::Quadratic { to, .. }
            | Segment::Close { to, .. } => to,
            Segment::Arc(arc) => arc.to,
        };
        self.cubic_ctrl = cubic_ctrl;
        self.quad_ctrl = quad_ctrl;
        segment
    }
}

/// Resolve a whole path at once.
pub fn segments(commands: &[PathCommand]) -> Vec<Segment> {
    let mut state = PathState::new(commands);
    commands.iter().map(|c| state.resolve(c)).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::path::parse_path;

    fn pt(x: f64, y: f64) -> Point2D {
        coord! {x: x, y: y}
    }

    #[test]
    fn test_smooth_cubic_reflects_previous_control() {
        let segs = segments(&parse_path("M0,0 C0,10 10,10 10,0 S20,-10 20,0"));
        assert_eq!(
            segs[2],
            Segment::Cubic {
                from: pt(10.0, 0.0),
                ctrl1: pt(10.0, -10.0),
                ctrl2: pt(20.0, -10.0),
                to: pt(20.0, 0.0)
            }
        );
    }

    #[test]
    fn test_smooth_cubic_without_predecessor_uses_current_point() {
        let segs = segments(&parse_path("M5,5 L10,5 S20,0 20,5"));
        match segs[2] {
            Segment::Cubic { ctrl1, .. } => assert_eq!(ctrl1, pt(10.0, 5.0)),
            other => panic!("unexpected {:?}", other),
        }
        // A quadratic in between breaks the cubic chain too
        let segs = segments(&parse_path("M0,0 C1,1 2,2 3,3 Q4,4 5,5 S7,7 8,8"));
        match segs[3] {
            Segment::Cubic { ctrl1, .. } => assert_eq!(ctrl1, pt(5.0, 5.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_smooth_quadratic_chain_carries_reflection() {
        let segs = segments(&parse_path("M0,0 Q5,10 10,0 T20,0 T30,0"));
        assert_eq!(
            segs[2],
            Segment::Quadratic {
                from: pt(10.0, 0.0),
                ctrl: pt(15.0, -10.0),
                to: pt(20.0, 0.0)
            }
        );
        assert_eq!(
            segs[3],
            Segment::Quadratic {
                from: pt(20.0, 0.0),
                ctrl: pt(25.0, 10.0),
                to: pt(30.0, 0.0)
            }
        );
    }

    #[test]
    fn test_lone_smooth_quadratic_is_a_line() {
        let segs = segments(&parse_path("M0,0 T10,0"));
        assert_eq!(
            segs[1],
            Segment::Quadratic {
                from: pt(0.0, 0.0),
                ctrl: pt(0.0, 0.0),
                to: pt(10.0, 0.0)
            }
        );
    }

    #[test]
    fn test_horizontal_and_vertical_keep_other_axis() {
        let segs = segments(&parse_path("M3,4 H10 V20"));
        assert_eq!(segs[1], Segment::Line { from: pt(3.0, 4.0), to: pt(10.0, 4.0) });
        assert_eq!(segs[2], Segment::Line { from: pt(10.0, 4.0), to: pt(10.0, 20.0) });
    }

    #[test]
    fn test_close_targets_initial_move() {
        let segs = segments(&parse_path("M1,1 L5,1 L5,5 M9,9 L10,10 Z"));
        assert_eq!(segs[5], Segment::Close { from: pt(10.0, 10.0), to: pt(1.0, 1.0) });

        let segs = segments(&parse_path("L5,5 Z"));
        assert_eq!(segs[1], Segment::Close { from: pt(5.0, 5.0), to: pt(0.0, 0.0) });
    }

    #[test]
    fn test_arc_starts_at_cursor() {
        let segs = segments(&parse_path("M10,0 A10,10 0 0 1 -10,0"));
        match segs[1] {
            Segment::Arc(arc) => {
                assert_eq!(arc.from, pt(10.0, 0.0));
                assert_eq!(arc.to, pt(-10.0, 0.0));
                assert!(arc.sweep && !arc.large_arc);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(segs[1].start(), pt(10.0, 0.0));
    }
}

//! From document coordinates to plotter coordinates.
//!
//! A shape's position on paper is decided by every element above it: group
//! transforms, nested `<svg>` viewports with their viewBox fitting rules, and
//! finally the caller's own placement (offset, mirror, rotation, scale). This
//! module folds all of that into one matrix per shape.
use geo_types::{coord, Rect};

use crate::config::ConvertOptions;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::geometry::matrix::{
    compose, flip_x, flip_y, rotate, scale, transform_point, translate, unit_matrix, AffineMatrix,
};
use crate::geometry::{PlotPoint, Point2D};

/// Where the viewBox lands along one axis of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisAlign {
    Min,
    Mid,
    Max,
}

impl AxisAlign {
    /// Extra offset that places `content` inside `available`.
    fn offset(&self, available: f64, content: f64) -> f64 {
        match self {
            AxisAlign::Min => 0.0,
            AxisAlign::Mid => (available - content) / 2.0,
            AxisAlign::Max => available - content,
        }
    }
}

/// Uniform scale policy: fit inside (meet) or cover (slice).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetOrSlice {
    Meet,
    Slice,
}

/// A parsed `preserveAspectRatio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    /// `None` is `preserveAspectRatio="none"`: stretch each axis on its own.
    pub align: Option<(AxisAlign, AxisAlign)>,
    pub meet_or_slice: MeetOrSlice,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            align: Some((AxisAlign::Mid, AxisAlign::Mid)),
            meet_or_slice: MeetOrSlice::Meet,
        }
    }
}

impl From<svgtypes::AspectRatio> for AspectRatio {
    fn from(value: svgtypes::AspectRatio) -> Self {
        use AxisAlign::{Max, Mid, Min};
        use svgtypes::Align;
        let align = match value.align {
            Align::None => None,
            Align::XMinYMin => Some((Min, Min)),
            Align::XMidYMin => Some((Mid, Min)),
            Align::XMaxYMin => Some((Max, Min)),
            Align::XMinYMid => Some((Min, Mid)),
            Align::XMidYMid => Some((Mid, Mid)),
            Align::XMaxYMid => Some((Max, Mid)),
            Align::XMinYMax => Some((Min, Max)),
            Align::XMidYMax => Some((Mid, Max)),
            Align::XMaxYMax => Some((Max, Max)),
        };
        AspectRatio {
            align,
            meet_or_slice: if value.slice {
                MeetOrSlice::Slice
            } else {
                MeetOrSlice::Meet
            },
        }
    }
}

impl AspectRatio {
    /// Parse a `preserveAspectRatio` value. Anything unrecognizable gives the
    /// default, `xMidYMid meet`.
    pub fn parse(text: &str) -> AspectRatio {
        text.trim()
            .parse::<svgtypes::AspectRatio>()
            .map(AspectRatio::from)
            .unwrap_or_default()
    }
}

/// A nested coordinate system: the viewport rectangle in the parent's
/// coordinates, the viewBox shown in it, and how the two are fitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFrame {
    pub position: Rect<f64>,
    pub view_box: Rect<f64>,
    pub aspect: AspectRatio,
}

/// Scale of one axis, or 1 when either size cannot be divided by.
fn axis_scale(available: f64, content: f64) -> f64 {
    let s = available / content;
    if s.is_finite() && s > 0.0 {
        s
    } else {
        1.0
    }
}

impl ViewportFrame {
    /// Maps viewBox coordinates into the parent's coordinates.
    pub fn matrix(&self) -> AffineMatrix {
        let (pos, view) = (self.position, self.view_box);
        let mut sx = axis_scale(pos.width(), view.width());
        let mut sy = axis_scale(pos.height(), view.height());
        let mut align_x = 0.0;
        let mut align_y = 0.0;
        if let Some((ax, ay)) = self.aspect.align {
            let uniform = match self.aspect.meet_or_slice {
                MeetOrSlice::Meet => sx.min(sy),
                MeetOrSlice::Slice => sx.max(sy),
            };
            sx = uniform;
            sy = uniform;
            align_x = ax.offset(pos.width(), view.width() * uniform);
            align_y = ay.offset(pos.height(), view.height() * uniform);
        }
        let tx = pos.min().x - view.min().x * sx + align_x;
        let ty = pos.min().y - view.min().y * sy + align_y;
        scale(&translate(&unit_matrix(), tx, ty), sx, sy)
    }
}

/// One level of a shape's ancestry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ancestor {
    /// A `transform` attribute, consolidated.
    Transform(AffineMatrix),
    /// An `<svg>` element.
    Viewport(ViewportFrame),
}

impl Ancestor {
    pub fn matrix(&self) -> AffineMatrix {
        match self {
            Ancestor::Transform(m) => *m,
            Ancestor::Viewport(frame) => frame.matrix(),
        }
    }
}

/// Fold a chain, outermost first, into the document-to-root matrix. The last
/// entry is applied to points first.
pub fn document_matrix(chain: &[Ancestor]) -> AffineMatrix {
    chain
        .iter()
        .fold(unit_matrix(), |acc, ancestor| compose(&acc, &ancestor.matrix()))
}

/// The caller's placement: translate, then mirror, then rotate, then scale,
/// read outside in (so scale applies to points first).
pub fn user_matrix(options: &ConvertOptions) -> AffineMatrix {
    let mut m = translate(&unit_matrix(), options.offset_x, options.offset_y);
    if options.mirror_x {
        m = flip_x(&m);
    }
    if options.mirror_y {
        m = flip_y(&m);
    }
    m = rotate(&m, options.rotation);
    scale(&m, options.scale, options.scale)
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Everything between a shape's local coordinates and integer plotter units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTransform {
    matrix: AffineMatrix,
}

impl PlotTransform {
    pub fn new(matrix: AffineMatrix) -> PlotTransform {
        PlotTransform { matrix }
    }

    pub fn identity() -> PlotTransform {
        PlotTransform::new(unit_matrix())
    }

    /// Transform, then round to the nearest plotter unit. Halves round up
    /// (towards +inf), negative ones included.
    pub fn apply(&self, point: Point2D) -> PlotPoint {
        let out = transform_point(&self.matrix, point);
        coord! {x: round_half_up(out.x), y: round_half_up(out.y)}
    }
}

/// The full transform for a shape: `user · document`. A chain with no
/// viewport in it belongs to no document; it is plotted untransformed
/// (rounding only) and reported.
pub fn resolve_transform(
    chain: &[Ancestor],
    options: &ConvertOptions,
    element: &str,
    diagnostics: &mut Diagnostics,
) -> PlotTransform {
    if !chain.iter().any(|a| matches!(a, Ancestor::Viewport(_))) {
        diagnostics.report(Diagnostic::DetachedElement {
            element: element.to_string(),
        });
        return PlotTransform::identity();
    }
    PlotTransform::new(compose(&user_matrix(options), &document_matrix(chain)))
}

//! The read-only shape list a conversion works from.
use indexmap::IndexMap;

use crate::geometry::Point2D;
use crate::viewport::Ancestor;

/// Reading scenes out of SVG markup.
pub mod reader;

pub use reader::read_scene;

/// Geometry of one primitive, in its own coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline(Vec<Point2D>),
    /// Like a polyline, but drawn closed.
    Polygon(Vec<Point2D>),
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    /// Corner radii as written; see [`crate::geometry::shapes::corner_radii`].
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: Option<f64>,
        ry: Option<f64>,
    },
    /// Raw path data, parsed at conversion time.
    Path(String),
}

impl ShapeKind {
    /// The SVG element name.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Line { .. } => "line",
            ShapeKind::Polyline(_) => "polyline",
            ShapeKind::Polygon(_) => "polygon",
            ShapeKind::Circle { .. } => "circle",
            ShapeKind::Ellipse { .. } => "ellipse",
            ShapeKind::Rect { .. } => "rect",
            ShapeKind::Path(_) => "path",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Normalized stroke color; `None` for unstroked shapes, which no pen draws.
    pub stroke: Option<String>,
    /// Every transform and viewport above the shape, outermost first, ending
    /// with the shape's own `transform`.
    pub ancestors: Vec<Ancestor>,
}

/// Shapes in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(shapes: Vec<Shape>) -> Scene {
        Scene { shapes }
    }

    /// Stroke index: normalized stroke → shape indices, both in document order.
    pub fn stroke_index(&self) -> IndexMap<String, Vec<usize>> {
        let mut index: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (i, shape) in self.shapes.iter().enumerate() {
            if let Some(stroke) = &shape.stroke {
                index.entry(stroke.clone()).or_default().push(i);
            }
        }
        index
    }

    /// The distinct stroke colors in first-seen order, ready to bind pens to.
    pub fn stroke_colors(&self) -> Vec<String> {
        self.stroke_index().into_keys().collect()
    }
}

use geo_types::Coord;

/// Affine matrices: the pure, immutable transform helpers everything else composes.
pub mod matrix;

/// Curve flattening. Cubic and quadratic Béziers, plus SVG elliptical arcs.
pub mod flatten;

/// Circles, ellipses and (rounded) rectangles as polylines.
pub mod shapes;

/// A point in the source document's local coordinate space.
pub type Point2D = Coord<f64>;

/// A final, rounded plot coordinate.
pub type PlotPoint = Coord<i64>;

//! ArmyOfEvilRobots SVG to HPGL conversion
//!
//! Takes stroked SVG artwork and turns it into a program for an HPGL pen
//! plotter: pen selection, pen up travel, pen down drawing. Every SVG path
//! command is supported, including smooth Béziers and elliptical arcs, and
//! shapes are placed with their full ancestry of group transforms and nested
//! viewports before the caller's own offset/mirror/rotation/scale.
//!
//! ```no_run
//! use aoer_svg2hpgl::prelude::*;
//!
//! let svg = std::fs::read_to_string("drawing.svg").unwrap();
//! let (hpgl, diagnostics) = convert_svg(&svg, &PlotConfig::default()).unwrap();
//! for diagnostic in &diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! println!("{}", hpgl);
//! ```
//!
//! *Nothing in here talks to a plotter; write the output wherever your
//! plotter is listening.*

/// Geometry helpers: matrices, curve flattening, basic shapes.
pub mod geometry;

/// SVG path data parsing.
pub mod path;

/// Ancestor transforms, viewports, and the caller's placement.
pub mod viewport;

/// The shape list a conversion reads from, and the SVG reader that builds it.
pub mod scene;

/// HPGL programs: instructions, serialization, bounds, pens and SVG preview.
pub mod hpgl;

/// The conversion itself.
pub mod convert;

/// RON loadable conversion settings.
pub mod config;

/// Non-fatal problems, collected and logged.
pub mod diagnostics;

/// Errors
pub mod errors;

/// Import prelude::* for the common entry points.
pub mod prelude {
    pub use crate::config::{ConvertOptions, PlotConfig};
    pub use crate::convert::{convert_svg, svg_to_hpgl, Conversion};
    pub use crate::diagnostics::{Diagnostic, Diagnostics};
    pub use crate::errors::{ConversionError, SceneError, SvgCreationError};
    pub use crate::hpgl::export::{program_to_pen_paths, program_to_svg, SvgExport};
    pub use crate::hpgl::pen::{PenSelector, StrokeMatch};
    pub use crate::hpgl::{build_hpgl, find_bounding_box, BoundingBox, Instruction, Program};
    pub use crate::path::{parse_path, parse_path_syntax, to_absolute, PathCommand};
    pub use crate::scene::{read_scene, Scene, Shape, ShapeKind};
}

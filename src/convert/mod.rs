//! Scene in, HPGL program out.
//!
//! For every pen, in declaration order: select it, lift it, send its extra
//! command, then plot each of its shapes in document order. Shapes are
//! flattened into polylines in their own coordinates and only then mapped
//! through their plot transform, so curve resolution is relative to the
//! document, not to the paper.
use geo_types::coord;

use crate::config::{ConvertOptions, PlotConfig};
use crate::diagnostics::Diagnostics;
use crate::errors::ConversionError;
use crate::geometry::flatten::{flatten_cubic, flatten_quadratic};
use crate::geometry::shapes::{circle, corner_radii, ellipse, rect, rounded_rect};
use crate::geometry::Point2D;
use crate::hpgl::pen::PenSelector;
use crate::hpgl::{build_hpgl, Instruction, Program};
use crate::path::{parse_path_reporting, PathCommand, PathState, Segment};
use crate::scene::{read_scene, Scene, Shape, ShapeKind};
use crate::viewport::{resolve_transform, PlotTransform};

/// A converted program plus everything that was skipped or guessed on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub program: Program,
    pub diagnostics: Diagnostics,
}

/// Appends transformed pen moves to a program.
struct Emitter<'p> {
    program: &'p mut Program,
    transform: PlotTransform,
}

impl<'p> Emitter<'p> {
    fn pen_up(&mut self, point: Point2D) {
        self.program
            .push(Instruction::PenUp(Some(self.transform.apply(point))));
    }

    fn pen_down(&mut self, point: Point2D) {
        self.program
            .push(Instruction::PenDown(Some(self.transform.apply(point))));
    }

    /// Travel to the first point, draw through the rest.
    fn polyline(&mut self, points: &[Point2D]) {
        if let Some((first, rest)) = points.split_first() {
            self.pen_up(*first);
            for point in rest {
                self.pen_down(*point);
            }
        }
    }

    fn path(&mut self, commands: &[PathCommand], segments_per_unit: f64) {
        let mut state = PathState::new(commands);
        let mut subpath_open = false;
        for command in commands {
            let segment = state.resolve(command);
            let tail: Vec<Point2D> = match segment {
                Segment::Move(to) => {
                    self.pen_up(to);
                    subpath_open = true;
                    continue;
                }
                Segment::Line { to, .. } | Segment::Close { to, .. } => vec![to],
                Segment::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to,
                } => flatten_cubic(from, ctrl1, ctrl2, to, segments_per_unit)
                    .0
                    .into_iter()
                    .skip(1)
                    .collect(),
                Segment::Quadratic { from, ctrl, to } => {
                    flatten_quadratic(from, ctrl, to, segments_per_unit)
                        .0
                        .into_iter()
                        .skip(1)
                        .collect()
                }
                Segment::Arc(arc) => arc.flatten(segments_per_unit).0.into_iter().skip(1).collect(),
            };
            if tail.is_empty() {
                continue;
            }
            // Never draw from wherever the pen happens to be.
            if !subpath_open {
                self.pen_up(segment.start());
                subpath_open = true;
            }
            for point in tail {
                self.pen_down(point);
            }
        }
    }
}

fn emit_shape(
    shape: &Shape,
    options: &ConvertOptions,
    program: &mut Program,
    diagnostics: &mut Diagnostics,
) {
    let transform = resolve_transform(&shape.ancestors, options, shape.kind.name(), diagnostics);
    let spu = options.segments_per_unit;
    let mut out = Emitter { program, transform };
    match &shape.kind {
        ShapeKind::Line { x1, y1, x2, y2 } => {
            out.polyline(&[coord! {x: *x1, y: *y1}, coord! {x: *x2, y: *y2}])
        }
        ShapeKind::Polyline(points) => out.polyline(points),
        ShapeKind::Polygon(points) => {
            out.polyline(points);
            if let Some(first) = points.first() {
                out.pen_down(*first);
            }
        }
        ShapeKind::Circle { cx, cy, r } => out.polyline(&circle(*cx, *cy, *r, spu).0),
        ShapeKind::Ellipse { cx, cy, rx, ry } => {
            out.polyline(&ellipse(*cx, *cy, *rx, *ry, spu).0)
        }
        ShapeKind::Rect {
            x,
            y,
            width,
            height,
            rx,
            ry,
        } => {
            let (rx, ry) = corner_radii(*width, *height, *rx, *ry);
            let outline = if rx > 0.0 && ry > 0.0 {
                rounded_rect(*x, *y, *width, *height, rx, ry, spu)
            } else {
                rect(*x, *y, *width, *height)
            };
            out.polyline(&outline.0)
        }
        ShapeKind::Path(data) => {
            let commands = parse_path_reporting(data, diagnostics);
            out.path(&commands, spu)
        }
    }
}

/// Convert a scene into a plotter program.
///
/// The program always starts with `PA`. A pen whose strokes match no shape
/// adds nothing at all. Pen 0 is not a drawing pen and is rejected up front.
pub fn svg_to_hpgl(
    scene: &Scene,
    pens: &[PenSelector],
    options: &ConvertOptions,
) -> Result<Conversion, ConversionError> {
    if let Some(pen) = pens.iter().find(|p| p.pen == 0) {
        return Err(ConversionError::InvalidPen(pen.pen));
    }
    let mut program: Program = vec![Instruction::PlotAbsolute];
    let mut diagnostics = Diagnostics::new();
    let index = scene.stroke_index();

    for pen in pens {
        let selected = pen.stroke.select(&index);
        if selected.is_empty() {
            log::debug!("Pen {} matches no shapes, skipping", pen.pen);
            continue;
        }
        log::trace!("Pen {}: {} shapes", pen.pen, selected.len());
        program.push(Instruction::SelectPen(pen.pen));
        program.push(Instruction::PenUp(None));
        if let Some(command) = &pen.command {
            program.push(Instruction::Raw(command.clone()));
        }
        for i in selected {
            emit_shape(&scene.shapes[i], options, &mut program, &mut diagnostics);
        }
    }

    Ok(Conversion {
        program,
        diagnostics,
    })
}

/// Read, convert and serialize in one go.
pub fn convert_svg(svg_text: &str, config: &PlotConfig) -> anyhow::Result<(String, Diagnostics)> {
    let mut diagnostics = Diagnostics::new();
    let scene = read_scene(svg_text, &mut diagnostics)?;
    let conversion = svg_to_hpgl(&scene, &config.pens, &config.options)?;
    diagnostics.extend(conversion.diagnostics);
    let hpgl = build_hpgl(&conversion.program, &config.prefix, &config.suffix);
    Ok((hpgl, diagnostics))
}

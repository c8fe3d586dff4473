use geo_types::{coord, Rect};
use svg::node::element::tag::Type;
use svg::parser::Event;
use svgtypes::{Length, LengthUnit, TransformListParser, TransformListToken, ViewBox};

use super::{Scene, Shape, ShapeKind};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::SceneError;
use crate::geometry::matrix::{
    compose, from_coefficients, rotate, scale, skew_x, skew_y, translate, unit_matrix,
    AffineMatrix,
};
use crate::geometry::Point2D;
use crate::hpgl::pen::normalize_stroke;
use crate::path::lexer;
use crate::viewport::{Ancestor, AspectRatio, ViewportFrame};

type Attributes = svg::node::Attributes;

/// Containers whose content is never rendered directly.
const HIDDEN_CONTAINERS: [&str; 6] = ["defs", "clipPath", "mask", "symbol", "marker", "pattern"];

/// One open element.
struct Frame {
    /// Effective stroke, still raw: may be `none`.
    stroke: Option<String>,
    /// How many entries this element pushed onto the ancestor chain.
    pushed: usize,
    hidden: bool,
}

/// Resolve a length to user units. Absolute CSS units only; percentages,
/// font-relative units and values that overflow give None.
pub fn parse_length(text: &str) -> Option<f64> {
    let length: Length = text.trim().parse().ok()?;
    let factor = match length.unit {
        LengthUnit::None | LengthUnit::Px => 1.0,
        LengthUnit::In => 96.0,
        LengthUnit::Cm => 96.0 / 2.54,
        LengthUnit::Mm => 96.0 / 25.4,
        LengthUnit::Pt => 96.0 / 72.0,
        LengthUnit::Pc => 16.0,
        _ => return None,
    };
    Some(length.number * factor).filter(|v| v.is_finite())
}

/// Consolidate a `transform` attribute into one matrix. Reading stops at the
/// first malformed or unknown function; everything before it still applies.
pub fn parse_transform(text: &str) -> AffineMatrix {
    let mut m = unit_matrix();
    for token in TransformListParser::from(text) {
        m = match token {
            Ok(TransformListToken::Matrix { a, b, c, d, e, f }) => {
                compose(&m, &from_coefficients(a, b, c, d, e, f))
            }
            Ok(TransformListToken::Translate { tx, ty }) => translate(&m, tx, ty),
            Ok(TransformListToken::Scale { sx, sy }) => scale(&m, sx, sy),
            Ok(TransformListToken::Rotate { angle }) => rotate(&m, angle),
            Ok(TransformListToken::SkewX { angle }) => skew_x(&m, angle),
            Ok(TransformListToken::SkewY { angle }) => skew_y(&m, angle),
            Err(error) => {
                log::debug!("Ignoring the rest of transform '{}': {}", text, error);
                break;
            }
        };
    }
    m
}

/// The `stroke` declaration of an inline style, if any.
fn style_stroke(style: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        if property.trim() != "stroke" {
            return None;
        }
        let value = value.trim().trim_end_matches("!important").trim();
        Some(value.to_string())
    })
}

/// Own style beats own attribute beats inheritance. `inherit` defers upwards.
fn resolve_stroke(attrs: &Attributes, inherited: Option<&String>) -> Option<String> {
    let own = attrs
        .get("style")
        .and_then(|style| style_stroke(style))
        .or_else(|| attrs.get("stroke").map(|v| v.to_string()));
    match own {
        Some(stroke) if stroke.trim() != "inherit" => Some(stroke),
        _ => inherited.cloned(),
    }
}

fn normalized(stroke: &Option<String>) -> Option<String> {
    match stroke.as_deref().map(str::trim) {
        None | Some("") | Some("none") => None,
        Some(stroke) => Some(normalize_stroke(stroke)),
    }
}

fn parse_view_box(text: &str) -> Option<Rect<f64>> {
    let ViewBox { x, y, w, h } = text.parse().ok()?;
    if w > 0.0 && h > 0.0 {
        Some(Rect::new(coord! {x: x, y: y}, coord! {x: x + w, y: y + h}))
    } else {
        None
    }
}

/// Attribute lookups for one element, reporting what cannot be used.
struct ElementAttributes<'a> {
    element: &'a str,
    attrs: &'a Attributes,
}

impl<'a> ElementAttributes<'a> {
    /// A length attribute; None when absent or unresolvable (reported).
    fn length(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<f64> {
        let value = self.attrs.get(name)?;
        if value.trim().is_empty() {
            return None;
        }
        let length = parse_length(value);
        if length.is_none() {
            diagnostics.report(Diagnostic::UnsupportedUnit {
                element: self.element.to_string(),
                attribute: name.to_string(),
                value: value.to_string(),
            });
        }
        length
    }

    /// A position, silently 0 when absent.
    fn position(&self, name: &str, diagnostics: &mut Diagnostics) -> f64 {
        self.length(name, diagnostics).unwrap_or(0.0)
    }

    /// A size the shape cannot do without; 0 and reported when absent.
    fn size(&self, name: &str, diagnostics: &mut Diagnostics) -> f64 {
        if !self.attrs.contains_key(name) {
            diagnostics.report(Diagnostic::MissingAttribute {
                element: self.element.to_string(),
                attribute: name.to_string(),
            });
        }
        self.length(name, diagnostics).unwrap_or(0.0)
    }

    fn points(&self, diagnostics: &mut Diagnostics) -> Vec<Point2D> {
        let data = match self.attrs.get("points") {
            Some(data) => data.to_string(),
            None => {
                diagnostics.report(Diagnostic::MissingAttribute {
                    element: self.element.to_string(),
                    attribute: "points".to_string(),
                });
                return vec![];
            }
        };
        lexer::numbers(&data, diagnostics)
            .chunks_exact(2)
            .map(|pair| coord! {x: pair[0], y: pair[1]})
            .collect()
    }

    fn shape_kind(&self, diagnostics: &mut Diagnostics) -> Option<ShapeKind> {
        let kind = match self.element {
            "line" => ShapeKind::Line {
                x1: self.position("x1", diagnostics),
                y1: self.position("y1", diagnostics),
                x2: self.position("x2", diagnostics),
                y2: self.position("y2", diagnostics),
            },
            "polyline" => ShapeKind::Polyline(self.points(diagnostics)),
            "polygon" => ShapeKind::Polygon(self.points(diagnostics)),
            "circle" => ShapeKind::Circle {
                cx: self.position("cx", diagnostics),
                cy: self.position("cy", diagnostics),
                r: self.size("r", diagnostics),
            },
            "ellipse" => ShapeKind::Ellipse {
                cx: self.position("cx", diagnostics),
                cy: self.position("cy", diagnostics),
                rx: self.size("rx", diagnostics),
                ry: self.size("ry", diagnostics),
            },
            "rect" => ShapeKind::Rect {
                x: self.position("x", diagnostics),
                y: self.position("y", diagnostics),
                width: self.size("width", diagnostics),
                height: self.size("height", diagnostics),
                rx: self.length("rx", diagnostics),
                ry: self.length("ry", diagnostics),
            },
            "path" => ShapeKind::Path(
                self.attrs
                    .get("d")
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ),
            _ => return None,
        };
        Some(kind)
    }
}

/// Walks the parser events, keeping the open element stack.
struct SceneReader<'d> {
    frames: Vec<Frame>,
    chain: Vec<Ancestor>,
    shapes: Vec<Shape>,
    /// viewBox of the outermost `<svg>`, the fallback size for nested ones.
    root_view_box: Option<Rect<f64>>,
    seen_svg: bool,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> SceneReader<'d> {
    fn new(diagnostics: &'d mut Diagnostics) -> Self {
        SceneReader {
            frames: vec![],
            chain: vec![],
            shapes: vec![],
            root_view_box: None,
            seen_svg: false,
            diagnostics,
        }
    }

    fn viewport(&mut self, attrs: &Attributes) -> ViewportFrame {
        let el = ElementAttributes {
            element: "svg",
            attrs,
        };
        let view_box = attrs
            .get("viewBox")
            .and_then(|vb| parse_view_box(vb));
        let outermost = !self.seen_svg;
        if outermost {
            self.root_view_box = view_box;
        }
        // The outermost viewport sits at the origin, whatever it says.
        let (x, y) = if outermost {
            (0.0, 0.0)
        } else {
            (
                el.position("x", self.diagnostics),
                el.position("y", self.diagnostics),
            )
        };
        let root = self.root_view_box;
        let width = el
            .length("width", self.diagnostics)
            .or_else(|| root.map(|r| r.width()))
            .unwrap_or(0.0);
        let height = el
            .length("height", self.diagnostics)
            .or_else(|| root.map(|r| r.height()))
            .unwrap_or(0.0);
        let position = Rect::new(coord! {x: x, y: y}, coord! {x: x + width, y: y + height});
        let view_box = view_box.unwrap_or_else(|| {
            Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: width, y: height})
        });
        let aspect = attrs
            .get("preserveAspectRatio")
            .map(|text| AspectRatio::parse(text))
            .unwrap_or_default();
        ViewportFrame {
            position,
            view_box,
            aspect,
        }
    }

    fn open(&mut self, name: &str, attrs: &Attributes, empty: bool) {
        let parent_hidden = self.frames.last().map(|f| f.hidden).unwrap_or(false);
        let inherited = self.frames.last().and_then(|f| f.stroke.clone());
        let hidden = parent_hidden || HIDDEN_CONTAINERS.contains(&name);
        let stroke = resolve_stroke(attrs, inherited.as_ref());

        let mut pushed = 0;
        if !hidden {
            if name == "svg" {
                let frame = self.viewport(attrs);
                self.seen_svg = true;
                self.chain.push(Ancestor::Viewport(frame));
                pushed += 1;
            } else if let Some(transform) = attrs.get("transform") {
                let m = parse_transform(transform);
                self.chain.push(Ancestor::Transform(m));
                pushed += 1;
            }

            let el = ElementAttributes {
                element: name,
                attrs,
            };
            if let Some(kind) = el.shape_kind(self.diagnostics) {
                log::trace!("read <{}> stroke {:?}", name, stroke);
                self.shapes.push(Shape {
                    kind,
                    stroke: normalized(&stroke),
                    ancestors: self.chain.clone(),
                });
            }
        }

        if empty {
            self.chain.truncate(self.chain.len() - pushed);
        } else {
            self.frames.push(Frame {
                stroke,
                pushed,
                hidden,
            });
        }
    }

    fn close(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.chain.truncate(self.chain.len() - frame.pushed);
        }
    }
}

/// Read every drawable shape of an SVG document.
pub fn read_scene(svg_text: &str, diagnostics: &mut Diagnostics) -> Result<Scene, SceneError> {
    let parser = svg::read(svg_text).map_err(|e| SceneError::Parse(e.to_string()))?;
    let mut reader = SceneReader::new(diagnostics);
    for event in parser {
        match event {
            Event::Error(error) => return Err(SceneError::Parse(error.to_string())),
            Event::Tag(name, Type::Start, attrs) => reader.open(name, &attrs, false),
            Event::Tag(name, Type::Empty, attrs) => reader.open(name, &attrs, true),
            Event::Tag(_, Type::End, _) => reader.close(),
            _ => {}
        }
    }
    if !reader.seen_svg {
        return Err(SceneError::NoDocument);
    }
    log::debug!("read_scene: {} shapes", reader.shapes.len());
    Ok(Scene::new(reader.shapes))
}

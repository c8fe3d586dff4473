//! SVG path data: `d="M10,10 L20,20 C1,1 2,2 3,3 Z"` in, absolute commands out.
//!
//! Parsing happens in two steps that are also exposed on their own:
//! [`parse_path_syntax`] groups the raw tokens into [`RawInstruction`]s (still
//! possibly relative), and [`to_absolute`] resolves them against a running
//! cursor into [`PathCommand`]s. [`parse_path`] does both.
use geo_types::coord;
use std::fmt;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::geometry::Point2D;

/// Path data tokenizer.
pub mod lexer;

/// Smooth curve continuation and segment resolution.
pub mod state;

use lexer::Token;
pub use state::{segments, PathState, Segment};

/// The ten SVG path commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CubicCurveTo,
    SmoothCubicCurveTo,
    QuadraticCurveTo,
    SmoothQuadraticCurveTo,
    ArcTo,
    ClosePath,
}

impl CommandKind {
    /// Kind and relative flag for a command letter, None for non-commands.
    pub fn from_letter(letter: char) -> Option<(CommandKind, bool)> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => CommandKind::MoveTo,
            'L' => CommandKind::LineTo,
            'H' => CommandKind::HorizontalLineTo,
            'V' => CommandKind::VerticalLineTo,
            'C' => CommandKind::CubicCurveTo,
            'S' => CommandKind::SmoothCubicCurveTo,
            'Q' => CommandKind::QuadraticCurveTo,
            'T' => CommandKind::SmoothQuadraticCurveTo,
            'A' => CommandKind::ArcTo,
            'Z' => CommandKind::ClosePath,
            _ => return None,
        };
        Some((kind, letter.is_ascii_lowercase()))
    }

    /// The absolute (uppercase) letter.
    pub fn letter(&self) -> char {
        match self {
            CommandKind::MoveTo => 'M',
            CommandKind::LineTo => 'L',
            CommandKind::HorizontalLineTo => 'H',
            CommandKind::VerticalLineTo => 'V',
            CommandKind::CubicCurveTo => 'C',
            CommandKind::SmoothCubicCurveTo => 'S',
            CommandKind::QuadraticCurveTo => 'Q',
            CommandKind::SmoothQuadraticCurveTo => 'T',
            CommandKind::ArcTo => 'A',
            CommandKind::ClosePath => 'Z',
        }
    }

    /// Numbers per argument group.
    pub fn arity(&self) -> usize {
        match self {
            CommandKind::MoveTo | CommandKind::LineTo => 2,
            CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo => 1,
            CommandKind::CubicCurveTo => 6,
            CommandKind::SmoothCubicCurveTo | CommandKind::QuadraticCurveTo => 4,
            CommandKind::SmoothQuadraticCurveTo => 2,
            CommandKind::ArcTo => 7,
            CommandKind::ClosePath => 0,
        }
    }
}

/// One command with its argument group, exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInstruction {
    pub kind: CommandKind,
    pub relative: bool,
    pub values: Vec<f64>,
}

/// An absolute path command. Produced by [`to_absolute`] and never mutated
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2D),
    LineTo(Point2D),
    HorizontalLineTo(f64),
    VerticalLineTo(f64),
    CubicCurveTo {
        ctrl1: Point2D,
        ctrl2: Point2D,
        end: Point2D,
    },
    /// First control point is implied by the previous command.
    SmoothCubicCurveTo { ctrl2: Point2D, end: Point2D },
    QuadraticCurveTo { ctrl: Point2D, end: Point2D },
    /// Control point is implied by the previous command.
    SmoothQuadraticCurveTo(Point2D),
    ArcTo {
        rx: f64,
        ry: f64,
        /// x-axis rotation, degrees
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point2D,
    },
    ClosePath,
}

impl PathCommand {
    /// Name the values of a raw instruction. Missing values read as 0, the
    /// relative flag is ignored here.
    pub fn from_raw(raw: &RawInstruction) -> PathCommand {
        let v = |i: usize| raw.values.get(i).copied().unwrap_or(0.0);
        let pt = |i: usize| coord! {x: v(i), y: v(i + 1)};
        match raw.kind {
            CommandKind::MoveTo => PathCommand::MoveTo(pt(0)),
            CommandKind::LineTo => PathCommand::LineTo(pt(0)),
            CommandKind::HorizontalLineTo => PathCommand::HorizontalLineTo(v(0)),
            CommandKind::VerticalLineTo => PathCommand::VerticalLineTo(v(0)),
            CommandKind::CubicCurveTo => PathCommand::CubicCurveTo {
                ctrl1: pt(0),
                ctrl2: pt(2),
                end: pt(4),
            },
            CommandKind::SmoothCubicCurveTo => PathCommand::SmoothCubicCurveTo {
                ctrl2: pt(0),
                end: pt(2),
            },
            CommandKind::QuadraticCurveTo => PathCommand::QuadraticCurveTo {
                ctrl: pt(0),
                end: pt(2),
            },
            CommandKind::SmoothQuadraticCurveTo => PathCommand::SmoothQuadraticCurveTo(pt(0)),
            CommandKind::ArcTo => PathCommand::ArcTo {
                rx: v(0),
                ry: v(1),
                rotation: v(2),
                large_arc: v(3) != 0.0,
                sweep: v(4) != 0.0,
                end: pt(5),
            },
            CommandKind::ClosePath => PathCommand::ClosePath,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            PathCommand::MoveTo(_) => CommandKind::MoveTo,
            PathCommand::LineTo(_) => CommandKind::LineTo,
            PathCommand::HorizontalLineTo(_) => CommandKind::HorizontalLineTo,
            PathCommand::VerticalLineTo(_) => CommandKind::VerticalLineTo,
            PathCommand::CubicCurveTo { .. } => CommandKind::CubicCurveTo,
            PathCommand::SmoothCubicCurveTo { .. } => CommandKind::SmoothCubicCurveTo,
            PathCommand::QuadraticCurveTo { .. } => CommandKind::QuadraticCurveTo,
            PathCommand::SmoothQuadraticCurveTo(_) => CommandKind::SmoothQuadraticCurveTo,
            PathCommand::ArcTo { .. } => CommandKind::ArcTo,
            PathCommand::ClosePath => CommandKind::ClosePath,
        }
    }

    /// The argument group, in SVG order.
    pub fn values(&self) -> Vec<f64> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p.x, p.y],
            PathCommand::HorizontalLineTo(x) => vec![x],
            PathCommand::VerticalLineTo(y) => vec![y],
            PathCommand::CubicCurveTo { ctrl1, ctrl2, end } => {
                vec![ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, end.x, end.y]
            }
            PathCommand::SmoothCubicCurveTo { ctrl2: c, end }
            | PathCommand::QuadraticCurveTo { ctrl: c, end } => vec![c.x, c.y, end.x, end.y],
            PathCommand::SmoothQuadraticCurveTo(end) => vec![end.x, end.y],
            PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                end,
            } => vec![rx, ry, rotation, flag(large_arc), flag(sweep), end.x, end.y],
            PathCommand::ClosePath => vec![],
        }
    }

    /// Back to an (absolute) raw instruction.
    pub fn to_raw(&self) -> RawInstruction {
        RawInstruction {
            kind: self.kind(),
            relative: false,
            values: self.values(),
        }
    }

    /// Shift every coordinate by `by`. Arc radii, rotation and flags are
    /// not coordinates and stay put.
    pub fn offset(&self, by: Point2D) -> PathCommand {
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(p + by),
            PathCommand::LineTo(p) => PathCommand::LineTo(p + by),
            PathCommand::HorizontalLineTo(x) => PathCommand::HorizontalLineTo(x + by.x),
            PathCommand::VerticalLineTo(y) => PathCommand::VerticalLineTo(y + by.y),
            PathCommand::CubicCurveTo { ctrl1, ctrl2, end } => PathCommand::CubicCurveTo {
                ctrl1: ctrl1 + by,
                ctrl2: ctrl2 + by,
                end: end + by,
            },
            PathCommand::SmoothCubicCurveTo { ctrl2, end } => PathCommand::SmoothCubicCurveTo {
                ctrl2: ctrl2 + by,
                end: end + by,
            },
            PathCommand::QuadraticCurveTo { ctrl, end } => PathCommand::QuadraticCurveTo {
                ctrl: ctrl + by,
                end: end + by,
            },
            PathCommand::SmoothQuadraticCurveTo(end) => {
                PathCommand::SmoothQuadraticCurveTo(end + by)
            }
            PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                end,
            } => PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                end: end + by,
            },
            PathCommand::ClosePath => PathCommand::ClosePath,
        }
    }

    /// x of the endpoint, if this command sets one.
    pub fn end_x(&self) -> Option<f64> {
        match *self {
            PathCommand::HorizontalLineTo(x) => Some(x),
            PathCommand::VerticalLineTo(_) | PathCommand::ClosePath => None,
            _ => self.end().map(|p| p.x),
        }
    }

    /// y of the endpoint, if this command sets one.
    pub fn end_y(&self) -> Option<f64> {
        match *self {
            PathCommand::VerticalLineTo(y) => Some(y),
            PathCommand::HorizontalLineTo(_) | PathCommand::ClosePath => None,
            _ => self.end().map(|p| p.y),
        }
    }

    /// Full endpoint for commands that carry both coordinates.
    pub fn end(&self) -> Option<Point2D> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicCurveTo { end, .. }
            | PathCommand::SmoothCubicCurveTo { end, .. }
            | PathCommand::QuadraticCurveTo { end, .. }
            | PathCommand::SmoothQuadraticCurveTo(end)
            | PathCommand::ArcTo { end, .. } => Some(end),
            PathCommand::HorizontalLineTo(_)
            | PathCommand::VerticalLineTo(_)
            | PathCommand::ClosePath => None,
        }
    }
}

/// Renders as compact path data, e.g. `M10,10` or `A5,5,0,0,1,20,0`.
impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let values: Vec<String> = self.values().iter().map(|v| v.to_string()).collect();
        write!(f, "{}{}", self.kind().letter(), values.join(","))
    }
}

/// Group the tokens of `data` into raw instructions.
///
/// Every complete argument group becomes one instruction, so `L1,2 3,4` is two
/// line-tos and the extra pairs after a move-to are implicit line-tos.
/// Unknown letters are reported and skipped, the command before them stays in
/// effect. Leftover numbers that do not fill a group are dropped, as are
/// numbers following a close-path.
pub fn parse_path_syntax(data: &str, diagnostics: &mut Diagnostics) -> Vec<RawInstruction> {
    let mut instructions: Vec<RawInstruction> = vec![];
    let mut kind = CommandKind::MoveTo;
    let mut relative = false;
    let mut values: Vec<f64> = vec![];

    for token in lexer::tokenize(data, diagnostics) {
        match token {
            Token::Command(letter) => {
                values.clear();
                match CommandKind::from_letter(letter) {
                    Some((new_kind, new_relative)) => {
                        kind = new_kind;
                        relative = new_relative;
                        if kind == CommandKind::ClosePath {
                            instructions.push(RawInstruction {
                                kind,
                                relative: false,
                                values: vec![],
                            });
                        }
                    }
                    None => diagnostics.report(Diagnostic::UnknownCommand(letter)),
                }
            }
            Token::Number(num) => {
                let arity = kind.arity();
                if arity == 0 {
                    continue;
                }
                values.push(num);
                if values.len() == arity {
                    instructions.push(RawInstruction {
                        kind,
                        relative,
                        values: std::mem::take(&mut values),
                    });
                    if kind == CommandKind::MoveTo {
                        kind = CommandKind::LineTo;
                    }
                }
            }
        }
    }
    log::trace!("parse_path_syntax: {} instructions", instructions.len());
    instructions
}

/// Resolve raw instructions into absolute commands.
///
/// A running cursor holds the last absolute endpoint; relative commands are
/// offset by it. Close-path leaves the cursor where it is. Running this over
/// already-absolute instructions returns them unchanged.
pub fn to_absolute(instructions: &[RawInstruction]) -> Vec<PathCommand> {
    let mut cursor: Point2D = coord! {x: 0.0, y: 0.0};
    instructions
        .iter()
        .map(|ins| {
            let command = PathCommand::from_raw(ins);
            let command = if ins.relative {
                command.offset(cursor)
            } else {
                command
            };
            if let Some(x) = command.end_x() {
                cursor.x = x;
            }
            if let Some(y) = command.end_y() {
                cursor.y = y;
            }
            command
        })
        .collect()
}

/// Parse path data into absolute commands, reporting anything skipped.
pub fn parse_path_reporting(data: &str, diagnostics: &mut Diagnostics) -> Vec<PathCommand> {
    to_absolute(&parse_path_syntax(data, diagnostics))
}

/// Parse path data into absolute commands. Malformed parts are skipped silently.
pub fn parse_path(data: &str) -> Vec<PathCommand> {
    parse_path_reporting(data, &mut Diagnostics::new())
}

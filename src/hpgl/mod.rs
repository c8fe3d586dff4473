//! The plotter side: HPGL instructions, programs, and their text form.
use std::fmt;

use crate::geometry::PlotPoint;

/// Pen selection: which pen draws which strokes.
pub mod pen;

/// Turning programs back into SVG, to eyeball what the plotter will do.
pub mod export;

/// One HPGL instruction. Coordinates are final, integer plotter units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `PA`: coordinates that follow are absolute.
    PlotAbsolute,
    /// `SPn`
    SelectPen(u32),
    /// `PU`, travel with the pen lifted. Without a point it only lifts the pen.
    PenUp(Option<PlotPoint>),
    /// `PD`, draw a line. Without a point it only lowers the pen.
    PenDown(Option<PlotPoint>),
    /// Caller supplied text, passed through untouched.
    Raw(String),
}

/// An ordered list of instructions. Order is plot order.
pub type Program = Vec<Instruction>;

impl Instruction {
    /// The mnemonic, `PU`, `SP`... Raw instructions have none.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::PlotAbsolute => "PA",
            Instruction::SelectPen(_) => "SP",
            Instruction::PenUp(_) => "PU",
            Instruction::PenDown(_) => "PD",
            Instruction::Raw(_) => "",
        }
    }

    /// The plotted point, for the instructions that carry one.
    pub fn point(&self) -> Option<PlotPoint> {
        match self {
            Instruction::PenUp(Some(pt)) | Instruction::PenDown(Some(pt)) => Some(*pt),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::PlotAbsolute => write!(f, "PA;"),
            Instruction::SelectPen(pen) => write!(f, "SP{};", pen),
            Instruction::PenUp(Some(pt)) | Instruction::PenDown(Some(pt)) => {
                write!(f, "{}{},{};", self.mnemonic(), pt.x, pt.y)
            }
            Instruction::PenUp(None) | Instruction::PenDown(None) => {
                write!(f, "{};", self.mnemonic())
            }
            Instruction::Raw(text) => {
                if text.ends_with(';') {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{};", text)
                }
            }
        }
    }
}

/// Serialize a program, wrapped in the caller's prefix and suffix.
pub fn build_hpgl(program: &[Instruction], prefix: &str, suffix: &str) -> String {
    let body: String = program.iter().map(|i| i.to_string()).collect();
    format!("{}{}{}", prefix, body, suffix)
}

/// Extent of everything a program travels to or draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
    pub width: i64,
    pub height: i64,
}

/// Bounding box of every pen up/down point. A program with no points has an
/// all-zero box.
pub fn find_bounding_box(program: &[Instruction]) -> BoundingBox {
    let mut points = program.iter().filter_map(|i| i.point());
    let first = match points.next() {
        Some(pt) => pt,
        None => return BoundingBox::default(),
    };
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (first.x, first.x, first.y, first.y);
    for pt in points {
        x_min = x_min.min(pt.x);
        x_max = x_max.max(pt.x);
        y_min = y_min.min(pt.y);
        y_max = y_max.max(pt.y);
    }
    BoundingBox {
        x_min,
        x_max,
        y_min,
        y_max,
        width: x_max - x_min,
        height: y_max - y_min,
    }
}

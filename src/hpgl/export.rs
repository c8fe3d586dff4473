use geo::BoundingRect;
use geo_types::{coord, Coord, LineString, MultiLineString, Rect};
use indexmap::IndexMap;
use svg::node::element::Path;
use svg::Document;

use super::pen::PenSelector;
use super::Instruction;
use crate::errors::SvgCreationError;

/// How the preview document is framed and drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgExport {
    /// Explicit view frame. Without one the program's own bounds are used.
    pub frame: Option<Rect<f64>>,
    /// Margin around the frame, as a fraction of its larger side.
    pub padding: f64,
    /// Stroke width in plotter units. Defaults to a thousandth of the larger side.
    pub stroke_width: Option<f64>,
}

impl Default for SvgExport {
    fn default() -> Self {
        Self {
            frame: None,
            padding: 0.0,
            stroke_width: None,
        }
    }
}

fn pen_runs(program: &[Instruction]) -> IndexMap<u32, Vec<&Instruction>> {
    let mut runs: IndexMap<u32, Vec<&Instruction>> = IndexMap::new();
    let mut pen = 0;
    for instruction in program {
        match instruction {
            Instruction::SelectPen(n) => pen = *n,
            other if other.point().is_some() => runs.entry(pen).or_default().push(other),
            _ => {}
        }
    }
    runs
}

/// Path data per pen, `PU` as `M` and `PD` as `L`. Points plotted before any
/// pen is selected are filed under pen 0. Pens appear in first-use order.
pub fn program_to_pen_paths(program: &[Instruction]) -> IndexMap<u32, String> {
    pen_runs(program)
        .into_iter()
        .map(|(pen, run)| {
            let data: Vec<String> = run
                .iter()
                .filter_map(|instruction| {
                    let pt = instruction.point()?;
                    let letter = match instruction {
                        Instruction::PenUp(_) => 'M',
                        _ => 'L',
                    };
                    Some(format!("{}{},{}", letter, pt.x, pt.y))
                })
                .collect();
            (pen, data.join(" "))
        })
        .collect()
}

/// Every plotted point as line strings, a new one at each pen up.
fn program_to_lines(program: &[Instruction]) -> MultiLineString<f64> {
    let mut lines: Vec<LineString<f64>> = vec![];
    let mut current: Vec<Coord<f64>> = vec![];
    for instruction in program {
        let pt = match instruction.point() {
            Some(pt) => coord! {x: pt.x as f64, y: pt.y as f64},
            None => continue,
        };
        if let Instruction::PenUp(_) = instruction {
            if !current.is_empty() {
                lines.push(LineString::new(std::mem::take(&mut current)));
            }
        }
        current.push(pt);
    }
    if !current.is_empty() {
        lines.push(LineString::new(current));
    }
    MultiLineString::new(lines)
}

/// The padded view frame the preview will use.
pub fn export_frame(
    program: &[Instruction],
    options: &SvgExport,
) -> Result<Rect<f64>, SvgCreationError> {
    let frame = match options.frame {
        Some(frame) => frame,
        None => program_to_lines(program)
            .bounding_rect()
            .ok_or(SvgCreationError::NullGeometry)?,
    };
    let pad = options.padding * frame.width().max(frame.height());
    Ok(Rect::new(
        coord! {x: frame.min().x - pad, y: frame.min().y - pad},
        coord! {x: frame.max().x + pad, y: frame.max().y + pad},
    ))
}

/// Preview document: one unfilled `<path>` per pen, stroked in the pen's
/// color when it draws exactly one, black otherwise.
pub fn program_to_svg(
    program: &[Instruction],
    options: &SvgExport,
    pens: &[PenSelector],
) -> Result<Document, SvgCreationError> {
    let frame = export_frame(program, options)?;
    let unpadded = options.frame.or_else(|| program_to_lines(program).bounding_rect());
    let stroke_width = options.stroke_width.unwrap_or_else(|| {
        unpadded
            .map(|r| r.width().max(r.height()) / 1000.0)
            .unwrap_or(0.0)
    });

    let mut document = Document::new()
        .set(
            "viewBox",
            (frame.min().x, frame.min().y, frame.width(), frame.height()),
        )
        .set("width", frame.width())
        .set("height", frame.height());

    for (pen, data) in program_to_pen_paths(program) {
        let color = pens
            .iter()
            .find(|p| p.pen == pen)
            .and_then(|p| p.color())
            .map(|c| c.to_hex_string())
            .unwrap_or_else(|| "black".to_string());
        document = document.add(
            Path::new()
                .set("fill", "none")
                .set("stroke", color)
                .set("stroke-width", stroke_width)
                .set("d", data),
        );
    }
    Ok(document)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hpgl::pen::StrokeMatch;
    use crate::path::{parse_path, PathCommand};

    fn pu(x: i64, y: i64) -> Instruction {
        Instruction::PenUp(Some(coord! {x: x, y: y}))
    }

    fn pd(x: i64, y: i64) -> Instruction {
        Instruction::PenDown(Some(coord! {x: x, y: y}))
    }

    fn program() -> Vec<Instruction> {
        vec![
            Instruction::PlotAbsolute,
            Instruction::SelectPen(1),
            Instruction::PenUp(None),
            pu(0, 0),
            pd(10, 0),
            pd(10, 10),
            Instruction::SelectPen(2),
            Instruction::PenUp(None),
            pu(20, 20),
            pd(30, 40),
        ]
    }

    #[test]
    fn test_pen_paths() {
        let paths = program_to_pen_paths(&program());
        assert_eq!(paths.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(paths[&1], "M0,0 L10,0 L10,10");
        assert_eq!(paths[&2], "M20,20 L30,40");
    }

    #[test]
    fn test_pen_paths_reparse() {
        let paths = program_to_pen_paths(&program());
        let commands = parse_path(&paths[&1]);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], PathCommand::MoveTo(coord! {x: 0.0, y: 0.0}));
        assert_eq!(commands[2], PathCommand::LineTo(coord! {x: 10.0, y: 10.0}));
    }

    #[test]
    fn test_points_before_pen_selection_go_to_pen_zero() {
        let paths = program_to_pen_paths(&[pu(1, 2), pd(3, 4), Instruction::SelectPen(5)]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[&0], "M1,2 L3,4");
    }

    #[test]
    fn test_frame_from_bounds_with_padding() {
        let frame = export_frame(
            &program(),
            &SvgExport {
                padding: 0.1,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(frame.min(), coord! {x: -4.0, y: -4.0});
        assert_eq!(frame.max(), coord! {x: 34.0, y: 44.0});
    }

    #[test]
    fn test_caller_frame_wins() {
        let given = Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: 100.0, y: 50.0});
        let frame = export_frame(
            &program(),
            &SvgExport {
                frame: Some(given),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(frame, given);
    }

    #[test]
    fn test_empty_program_without_frame_fails() {
        let result = program_to_svg(&[Instruction::PlotAbsolute], &SvgExport::default(), &[]);
        assert_eq!(result.err(), Some(SvgCreationError::NullGeometry));
    }

    #[test]
    fn test_document_has_one_path_per_pen() {
        let pens = vec![
            PenSelector::new(1, StrokeMatch::Color("red".into())),
            PenSelector::new(2, StrokeMatch::Any),
        ];
        let document = program_to_svg(&program(), &SvgExport::default(), &pens).unwrap();
        let text = document.to_string();
        assert_eq!(text.matches("<path").count(), 2);
        assert!(text.contains("#ff0000"));
        assert!(text.contains("black"));
        assert!(text.contains("M0,0 L10,0 L10,10"));
    }
}

pub use csscolorparser::Color as CssColor;
pub use csscolorparser::parse as parse_css_color;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which strokes a pen draws.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub enum StrokeMatch {
    /// Every stroked shape, grouped by stroke in first-seen order.
    #[default]
    Any,
    /// One CSS color.
    Color(String),
    /// Several CSS colors, drawn in list order.
    Colors(Vec<String>),
}

impl StrokeMatch {
    /// Shape indices this matcher selects out of a stroke index.
    pub fn select(&self, index: &IndexMap<String, Vec<usize>>) -> Vec<usize> {
        match self {
            StrokeMatch::Any => index.values().flatten().copied().collect(),
            StrokeMatch::Color(color) => index
                .get(&normalize_stroke(color))
                .cloned()
                .unwrap_or_default(),
            StrokeMatch::Colors(colors) => colors
                .iter()
                .filter_map(|color| index.get(&normalize_stroke(color)))
                .flatten()
                .copied()
                .collect(),
        }
    }
}

/// One pen of the plotter, and the strokes it is responsible for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PenSelector {
    pub pen: u32,
    #[serde(default)]
    pub stroke: StrokeMatch,
    /// Extra instruction sent after selecting the pen, e.g. `VS10` to slow it down.
    #[serde(default)]
    pub command: Option<String>,
}

impl PenSelector {
    pub fn new(pen: u32, stroke: StrokeMatch) -> PenSelector {
        PenSelector {
            pen,
            stroke,
            command: None,
        }
    }

    pub fn with_command(mut self, command: &str) -> PenSelector {
        self.command = Some(command.to_string());
        self
    }

    /// The color to preview this pen with, if it draws exactly one color.
    pub fn color(&self) -> Option<CssColor> {
        match &self.stroke {
            StrokeMatch::Color(color) => parse_css_color(color).ok(),
            _ => None,
        }
    }
}

/// Canonical form of a stroke value, so `red`, `#F00` and `rgb(255,0,0)`
/// group together. Anything csscolorparser rejects is kept as trimmed,
/// lowercased text.
pub fn normalize_stroke(stroke: &str) -> String {
    let stroke = stroke.trim();
    match parse_css_color(stroke) {
        Ok(color) => color.to_hex_string(),
        Err(_) => stroke.to_lowercase(),
    }
}

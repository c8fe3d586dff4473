use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::hpgl::pen::{PenSelector, StrokeMatch};

fn one() -> f64 {
    1.0
}

/// Global knobs applied to every shape of a conversion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Curve resolution. Arcs get this many segments per unit of length,
    /// Béziers ten times finer.
    #[serde(default = "one")]
    pub segments_per_unit: f64,
    /// Degrees, about the plot origin.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    /// Uniform scale from document units to plotter units.
    #[serde(default = "one")]
    pub scale: f64,
    #[serde(default)]
    pub mirror_x: bool,
    #[serde(default)]
    pub mirror_y: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            segments_per_unit: 1.0,
            rotation: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            mirror_x: false,
            mirror_y: false,
        }
    }
}

/// A whole conversion setup: which pens draw what, how, and what wraps the output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub pens: Vec<PenSelector>,
    #[serde(default)]
    pub options: ConvertOptions,
    /// Emitted verbatim before the program, e.g. `IN;`.
    #[serde(default)]
    pub prefix: String,
    /// Emitted verbatim after the program, e.g. `SP0;`.
    #[serde(default)]
    pub suffix: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            pens: vec![PenSelector {
                pen: 1,
                stroke: StrokeMatch::Any,
                command: None,
            }],
            options: ConvertOptions::default(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

impl PlotConfig {
    pub fn from_str(data: &str) -> Result<PlotConfig> {
        let config = ron::from_str(data)?;
        Ok(config)
    }

    pub fn from_file(path: &PathBuf) -> Result<PlotConfig> {
        let mut reader = std::fs::File::open(path)?;
        let mut data = String::new();
        reader.read_to_string(&mut data)?;
        PlotConfig::from_str(data.as_str())
    }

    pub fn to_string(&self) -> String {
        ron::to_string(self).expect("A plot config is always serializable")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = PlotConfig::from_str("(pens: [(pen: 2, stroke: Color(\"red\"))])").unwrap();
        assert_eq!(config.pens.len(), 1);
        assert_eq!(config.pens[0].pen, 2);
        assert_eq!(config.pens[0].stroke, StrokeMatch::Color("red".to_string()));
        assert_eq!(config.pens[0].command, None);
        assert_eq!(config.options, ConvertOptions::default());
        assert_eq!(config.prefix, "");
    }

    #[test]
    fn test_options_parse() {
        let config = PlotConfig::from_str(
            "(pens: [(pen: 1, stroke: Any, command: Some(\"VS10\"))], \
             options: (scale: 40.0, mirror_y: true, segments_per_unit: 0.5), \
             prefix: \"IN;\")",
        )
        .unwrap();
        assert_eq!(config.options.scale, 40.0);
        assert!(config.options.mirror_y);
        assert!(!config.options.mirror_x);
        assert_eq!(config.options.segments_per_unit, 0.5);
        assert_eq!(config.options.rotation, 0.0);
        assert_eq!(config.pens[0].command.as_deref(), Some("VS10"));
        assert_eq!(config.prefix, "IN;");
    }

    #[test]
    fn test_roundtrip_through_ron() {
        let config = PlotConfig::default();
        let again = PlotConfig::from_str(&config.to_string()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(PlotConfig::from_str("(pens: 12)").is_err());
        assert!(PlotConfig::from_file(&PathBuf::from("/nonexistent/plot.ron")).is_err());
    }
}

use std::fmt;

/// Caller contract violations, detected before any geometry is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Pen numbers start at 1; `SP0` means "put the pen away".
    InvalidPen(u32),
}

impl std::error::Error for ConversionError {}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConversionError::InvalidPen(pen) => {
                write!(f, "Invalid pen number {}, pens are numbered from 1", pen)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The markup could not be read at all.
    Parse(String),
    /// Readable, but there is no `<svg>` element in it.
    NoDocument,
}

impl std::error::Error for SceneError {}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SceneError::Parse(msg) => write!(f, "Could not read SVG: {}", msg),
            SceneError::NoDocument => write!(f, "No <svg> element found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SvgCreationError {
    NullGeometry,
}

impl std::error::Error for SvgCreationError {}

impl fmt::Display for SvgCreationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SvgCreationError::NullGeometry => write!(f, "Empty/Invalid/Dimensionless geometry"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ConversionError::InvalidPen(0).to_string(),
            "Invalid pen number 0, pens are numbered from 1"
        );
        assert_eq!(SceneError::NoDocument.to_string(), "No <svg> element found");
        let boxed: Box<dyn std::error::Error> = Box::new(SvgCreationError::NullGeometry);
        assert_eq!(boxed.to_string(), "Empty/Invalid/Dimensionless geometry");
    }
}

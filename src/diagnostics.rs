//! Non-fatal problems found while reading or converting a scene.
//!
//! Nothing in the geometry pipeline aborts on bad input; it recovers and
//! reports here instead, so callers (and tests) can inspect what was skipped.
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A numeric token in path/points data that did not parse; it was dropped.
    MalformedNumber(String),
    /// A letter in path data that is not a path command; it was skipped.
    UnknownCommand(char),
    /// A shape with no viewport ancestor; it was plotted with the identity transform.
    DetachedElement { element: String },
    /// A geometry attribute that was absent; it was read as zero.
    MissingAttribute { element: String, attribute: String },
    /// A length we cannot resolve to user units (percentages, font-relative units).
    UnsupportedUnit {
        element: String,
        attribute: String,
        value: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::MalformedNumber(token) => {
                write!(f, "Dropped malformed number '{}' in path data", token)
            }
            Diagnostic::UnknownCommand(letter) => {
                write!(f, "Skipped unknown path command '{}'", letter)
            }
            Diagnostic::DetachedElement { element } => write!(
                f,
                "No owning <svg> for <{}>, using the identity transform",
                element
            ),
            Diagnostic::MissingAttribute { element, attribute } => write!(
                f,
                "Attribute '{}' missing on <{}>, treated as 0",
                attribute, element
            ),
            Diagnostic::UnsupportedUnit {
                element,
                attribute,
                value,
            } => write!(
                f,
                "Cannot resolve {}=\"{}\" on <{}> to user units",
                attribute, value, element
            ),
        }
    }
}

/// Ordered collection of [`Diagnostic`]s. Every report is also logged at warn level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics { items: vec![] }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

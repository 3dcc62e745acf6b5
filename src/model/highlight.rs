//! Highlight values: a color painted over a range.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::position::Range;

/// Opaque color token, e.g. an RGBA hex code like `#ffeb3b40`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Color {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A colored annotation over a range.
///
/// This is the value half of a stored highlight; the rendering handle lives
/// alongside it in [`crate::highlight::store::DocumentHighlights`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Highlight {
    pub range: Range,
    pub color: Color,
}

impl Highlight {
    pub fn new(range: Range, color: impl Into<Color>) -> Self {
        Self {
            range,
            color: color.into(),
        }
    }
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.range, self.color)
    }
}

//! Core value types - positions, ranges, selections, highlights and
//! document identity.

pub mod document;
pub mod highlight;
pub mod position;
pub mod selection;

pub use document::{DocumentKey, DocumentText};
pub use highlight::{Color, Highlight};
pub use position::{Position, Range};
pub use selection::Selection;

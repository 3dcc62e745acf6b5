//! Error types for user-facing highlight failures
//!
//! None of these abort a session: the controller turns them into warnings
//! for the host to display and leaves highlight state untouched.

use thiserror::Error;

use crate::model::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// Paint or clear was requested without a non-empty selection
    #[error("Please select text to highlight")]
    InvalidSelection,

    /// Requested color index is outside `1..=available`
    #[error("Color {index} not available. Available colors: 1-{available}")]
    InvalidColorIndex { index: usize, available: usize },

    /// A persisted entry could not be turned back into a highlight
    #[error("Skipping stored highlight #{index} for {key}: {reason}")]
    CorruptPersistedEntry {
        key: String,
        index: usize,
        reason: String,
    },

    /// A color pick is already waiting for an answer
    #[error("A color choice is already pending")]
    PickerBusy,

    /// A position lies outside the document
    #[error("Position {0} is outside the document")]
    PositionOutOfBounds(Position),
}

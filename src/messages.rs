//! Message types for the Elm-style architecture
//!
//! Every host event that can touch highlight state arrives as one of these.

use ropey::Rope;

use crate::highlight::TextChange;
use crate::model::{DocumentKey, Selection};
use crate::session::PickToken;

/// Editor focus and selection reported by the host
#[derive(Debug, Clone)]
pub enum EditorMsg {
    /// An editor for `key` got focus; `text` is its current content
    Activated { key: DocumentKey, text: Rope },
    /// The active editor's selection moved
    SelectionChanged(Selection),
}

/// One edit batch from the host, changes in reported order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBatch {
    pub key: DocumentKey,
    pub changes: Vec<TextChange>,
}

impl EditBatch {
    pub fn new(key: DocumentKey, changes: Vec<TextChange>) -> Self {
        Self { key, changes }
    }

    pub fn single(key: DocumentKey, change: TextChange) -> Self {
        Self::new(key, vec![change])
    }
}

/// Document-level notifications
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// Text in a document changed
    Changed(EditBatch),
    /// A document was closed by the host
    Closed(DocumentKey),
}

/// User commands against the active editor's selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMsg {
    /// Paint the selection with configured color N (1-based)
    ApplyColor(usize),
    /// Remove coloring under the selection
    ClearSelection,
    /// Remove every highlight in the active document
    ClearAll,
    /// Ask the user for a color, then paint the selection
    PickColor,
}

/// Answers to a color pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMsg {
    /// The user chose color N (1-based)
    Chosen { token: PickToken, index: usize },
    /// The user dismissed the picker
    Cancelled(PickToken),
    /// The pick's timeout fired
    TimedOut(PickToken),
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Editor(EditorMsg),
    Document(DocumentMsg),
    Highlight(HighlightMsg),
    Picker(PickerMsg),
}

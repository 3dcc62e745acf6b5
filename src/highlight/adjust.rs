//! Range adjustment - translating stored ranges through document edits.
//!
//! An edit is described by the span it replaced (in pre-edit coordinates)
//! and the text inserted in its place. Only the shape of the inserted text
//! matters: its line break count and the length of its last line.
//!
//! Rules, evaluated in order:
//! 1. Edit ends before the range starts: the range moves with the text
//!    after the edit.
//! 2. Edit starts after the range ends: unchanged.
//! 3. Edit covers the whole range: the range is deleted.
//! 4. Partial overlap: unchanged. Highlight data is kept rather than
//!    shrunk to fit. The result is flagged [`Adjusted::Overlapped`] because
//!    its bounds no longer describe the text exactly.

use ropey::Rope;
use serde::{Deserialize, Serialize};

use crate::model::{Position, Range};

/// A single replacement reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    /// Replaced span, in pre-edit coordinates
    pub range: Range,
    /// Replacement text
    pub text: String,
}

impl TextChange {
    pub fn new(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Pure insertion at `pos`
    pub fn insert(pos: Position, text: impl Into<String>) -> Self {
        Self::new(Range::empty(pos), text)
    }

    /// Pure deletion of `range`
    pub fn delete(range: Range) -> Self {
        Self::new(range, String::new())
    }

    /// Break count and last-line length of the inserted text, with line
    /// breaks as the document rope sees them (`\r\n`, `\n`, lone `\r`,
    /// VT, FF, NEL, U+2028, U+2029)
    fn text_shape(&self) -> (usize, usize) {
        let text = Rope::from_str(&self.text);
        let last = text.len_lines() - 1;
        (last, text.line(last).len_chars())
    }

    /// Number of line breaks in the inserted text
    pub fn newline_count(&self) -> usize {
        self.text_shape().0
    }

    /// Chars after the last line break of the inserted text
    /// (the whole text when it has no line break)
    pub fn last_line_len(&self) -> usize {
        self.text_shape().1
    }

    /// Net change in the document's line count
    pub fn lines_added(&self) -> isize {
        let removed = self.range.end().line - self.range.start().line;
        self.newline_count() as isize - removed as isize
    }

    /// Where a position at or after the end of the replaced span lands
    /// once the edit is applied.
    ///
    /// Positions on the edit's last line are rebuilt from the inserted
    /// text's last line; positions on later lines keep their column and
    /// move by the net line delta.
    fn shift(&self, pos: Position) -> Position {
        let start = self.range.start();
        let end = self.range.end();
        let (newlines, last_line_len) = self.text_shape();
        debug_assert!(pos >= end, "shift expects a position after the edit");

        if pos.line == end.line {
            let base = if newlines == 0 {
                start.column + last_line_len
            } else {
                last_line_len
            };
            Position::new(start.line + newlines, base + (pos.column - end.column))
        } else {
            Position::new(pos.line - end.line + start.line + newlines, pos.column)
        }
    }
}

/// Outcome of adjusting one range through one edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjusted {
    /// Range moved with the text (or was not affected)
    Kept(Range),
    /// Edit partially overlapped the range; bounds left as they were
    Overlapped(Range),
    /// Edit covered the whole range
    Deleted,
}

impl Adjusted {
    pub fn range(self) -> Option<Range> {
        match self {
            Adjusted::Kept(range) | Adjusted::Overlapped(range) => Some(range),
            Adjusted::Deleted => None,
        }
    }
}

/// Translate `range` through a single edit
pub fn adjust(range: Range, change: &TextChange) -> Adjusted {
    let edit = change.range;

    if edit.end() < range.start() {
        return Adjusted::Kept(Range::new(
            change.shift(range.start()),
            change.shift(range.end()),
        ));
    }

    if edit.start() > range.end() {
        return Adjusted::Kept(range);
    }

    if edit.contains_range(&range) {
        return Adjusted::Deleted;
    }

    Adjusted::Overlapped(range)
}

/// How the changes of one edit batch relate to each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOrder {
    /// Each change assumes the earlier ones in the batch already happened
    #[default]
    Sequential,
    /// Every change is expressed in pre-batch coordinates
    Original,
}

/// Order a batch's changes so they can be applied one after another.
///
/// Changes in original coordinates are applied from the end of the
/// document backwards, which keeps each change's coordinates valid.
pub fn ordered_changes(changes: &[TextChange], order: BatchOrder) -> Vec<&TextChange> {
    let mut ordered: Vec<&TextChange> = changes.iter().collect();
    if order == BatchOrder::Original {
        ordered.sort_by(|a, b| b.range.start().cmp(&a.range.start()));
    }
    ordered
}

/// Translate `range` through every change of an already ordered batch.
/// One partial overlap anywhere in the batch flags the result.
pub fn adjust_through(range: Range, changes: &[&TextChange]) -> Adjusted {
    let mut current = range;
    let mut overlapped = false;
    for change in changes {
        match adjust(current, change) {
            Adjusted::Kept(next) => current = next,
            Adjusted::Overlapped(next) => {
                current = next;
                overlapped = true;
            }
            Adjusted::Deleted => return Adjusted::Deleted,
        }
    }
    if overlapped {
        Adjusted::Overlapped(current)
    } else {
        Adjusted::Kept(current)
    }
}

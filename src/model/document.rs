//! Document identity and the read-only view of document text the
//! highlighter needs.

use std::borrow::Borrow;
use std::fmt;
use std::path::Path;

use ropey::Rope;

use super::position::Position;
use crate::error::HighlightError;
use crate::highlight::adjust::TextChange;

/// Stable identifier for a document across edits and focus changes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for a file on disk (canonicalized when possible)
    pub fn from_path(path: &Path) -> Self {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self(canonical.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DocumentKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Line-level shape of a document, used to validate stored positions
pub trait DocumentText {
    /// Number of lines (a trailing newline starts a final empty line)
    fn line_count(&self) -> usize;

    /// Length of `line` in chars, excluding the line break
    fn line_len(&self, line: usize) -> Option<usize>;

    /// Whether `pos` names a real place in the document
    fn can_represent(&self, pos: Position) -> bool {
        self.line_len(pos.line)
            .is_some_and(|len| pos.column <= len)
    }
}

impl DocumentText for Rope {
    fn line_count(&self) -> usize {
        self.len_lines()
    }

    fn line_len(&self, line: usize) -> Option<usize> {
        if line >= self.len_lines() {
            return None;
        }
        let slice = self.line(line);
        let mut len = slice.len_chars();
        if len > 0 && is_line_break(slice.char(len - 1)) {
            len -= 1;
            if slice.char(len) == '\n' && len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        Some(len)
    }
}

/// Chars that end a line in a [`Rope`]
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Convert a line/column position into a char index within the rope
pub fn char_index(rope: &Rope, pos: Position) -> Result<usize, HighlightError> {
    if !rope.can_represent(pos) {
        return Err(HighlightError::PositionOutOfBounds(pos));
    }
    Ok(rope.line_to_char(pos.line) + pos.column)
}

/// Apply a replacement to the rope
pub fn apply_change(rope: &mut Rope, change: &TextChange) -> Result<(), HighlightError> {
    let start = char_index(rope, change.range.start())?;
    let end = char_index(rope, change.range.end())?;
    rope.remove(start..end);
    rope.insert(start, &change.text);
    Ok(())
}

//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use ropey::Rope;
use tint::commands::Cmd;
use tint::config::HighlighterConfig;
use tint::highlight::TextChange;
use tint::messages::{DocumentMsg, EditBatch, EditorMsg, HighlightMsg, Msg};
use tint::model::{DocumentKey, Highlight, Position, Range, Selection};
use tint::persistence::MemoryStorage;
use tint::render::DecorationTable;
use tint::session::Session;
use tint::update::update;

pub type TestSession = Session<DecorationTable, MemoryStorage>;

/// Ten lines of forty chars each, enough room for any range used in tests
pub fn sample_text() -> Rope {
    let line = "abcdefghijklmnopqrstuvwxyz0123456789ABCD\n";
    Rope::from_str(&line.repeat(10))
}

pub fn doc(name: &str) -> DocumentKey {
    DocumentKey::new(format!("file:///{}", name))
}

/// Create a session with default config and in-memory collaborators
pub fn test_session() -> TestSession {
    test_session_with(HighlighterConfig::default(), MemoryStorage::new())
}

pub fn test_session_with(config: HighlighterConfig, storage: MemoryStorage) -> TestSession {
    Session::new(config, DecorationTable::new(), storage)
}

/// Create a session with `key` loaded and focused
pub fn active_session(key: &DocumentKey) -> TestSession {
    let mut session = test_session();
    activate(&mut session, key);
    session
}

pub fn activate(session: &mut TestSession, key: &DocumentKey) -> Option<Cmd> {
    update(
        session,
        Msg::Editor(EditorMsg::Activated {
            key: key.clone(),
            text: sample_text(),
        }),
    )
}

pub fn select(session: &mut TestSession, range: Range) {
    update(
        session,
        Msg::Editor(EditorMsg::SelectionChanged(Selection::from(range))),
    );
}

/// Select `range` and apply color N
pub fn paint(session: &mut TestSession, range: Range, index: usize) -> Option<Cmd> {
    select(session, range);
    update(session, Msg::Highlight(HighlightMsg::ApplyColor(index)))
}

/// Select `range` and clear it
pub fn clear(session: &mut TestSession, range: Range) -> Option<Cmd> {
    select(session, range);
    update(session, Msg::Highlight(HighlightMsg::ClearSelection))
}

pub fn edit(session: &mut TestSession, key: &DocumentKey, changes: Vec<TextChange>) -> Option<Cmd> {
    update(
        session,
        Msg::Document(DocumentMsg::Changed(EditBatch::new(key.clone(), changes))),
    )
}

/// Shorthand for a single-line range
pub fn span(line: usize, start: usize, end: usize) -> Range {
    Range::from_coords(line, start, line, end)
}

pub fn pos(line: usize, column: usize) -> Position {
    Position::new(line, column)
}

/// Color token configured at 1-based `index` in the default config
pub fn color(index: usize) -> String {
    HighlighterConfig::default().colors[index - 1].clone()
}

/// The session's highlights for `key` as (range, color token) pairs, sorted
pub fn ranges(session: &TestSession, key: &DocumentKey) -> Vec<(Range, String)> {
    let mut out: Vec<(Range, String)> = session
        .highlights(key)
        .into_iter()
        .map(|h: Highlight| (h.range, h.color.as_str().to_string()))
        .collect();
    out.sort_by_key(|(r, _)| r.start());
    out
}

/// Every handle ever created is either live or released exactly once
pub fn assert_handles_balanced(session: &TestSession) {
    let table = session.renderer();
    assert_eq!(
        table.created_count(),
        table.live_count() + table.released_count(),
        "handle accounting out of balance: {:?}",
        table
    );
}

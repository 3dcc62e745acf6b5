//! Update functions for the Elm-style architecture
//!
//! All highlight state transformations flow through these functions.

mod document;
mod editor;
mod highlight;
mod picker;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::persistence::Storage;
use crate::render::Renderer;
use crate::session::Session;

#[cfg(debug_assertions)]
use crate::tracing::HighlightSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use document::update_document;
pub use editor::update_editor;
pub use highlight::update_highlight;
pub use picker::update_picker;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update<R: Renderer, S: Storage>(session: &mut Session<R, S>, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(session, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(session, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner<R: Renderer, S: Storage>(session: &mut Session<R, S>, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Editor(m) => editor::update_editor(session, m),
        Msg::Document(m) => document::update_document(session, m),
        Msg::Highlight(m) => highlight::update_highlight(session, m),
        Msg::Picker(m) => picker::update_picker(session, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures the active document's highlights before and after and logs
/// the difference. Selection changes are too frequent to log.
#[cfg(debug_assertions)]
fn update_traced<R: Renderer, S: Storage>(session: &mut Session<R, S>, msg: Msg) -> Option<Cmd> {
    use crate::messages::EditorMsg;

    let is_noisy = matches!(&msg, Msg::Editor(EditorMsg::SelectionChanged(_)));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = HighlightSnapshot::from_session(session);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(session, msg);

    let after = HighlightSnapshot::from_session(session);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "highlights", %diff, "state changed");
    }

    session.assert_invariants();
    result
}

/// Get a display name for a message type
///
/// Document text and edit payloads are summarized rather than dumped.
/// Example outputs:
/// - `Highlight::ApplyColor(2)`
/// - `Editor::Activated(src/main.rs)`
/// - `Document::Changed(src/main.rs, 3 changes)`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::{DocumentMsg, EditorMsg};

    match msg {
        Msg::Editor(EditorMsg::Activated { key, .. }) => format!("Editor::Activated({})", key),
        Msg::Editor(m) => format!("Editor::{:?}", m),
        Msg::Document(DocumentMsg::Changed(batch)) => format!(
            "Document::Changed({}, {} changes)",
            batch.key,
            batch.changes.len()
        ),
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::Highlight(m) => format!("Highlight::{:?}", m),
        Msg::Picker(m) => format!("Picker::{:?}", m),
    }
}

//! Editor focus and selection handlers

use crate::commands::Cmd;
use crate::messages::EditorMsg;
use crate::persistence::Storage;
use crate::render::Renderer;
use crate::session::Session;

/// Handle editor messages (focus, selection)
pub fn update_editor<R: Renderer, S: Storage>(
    session: &mut Session<R, S>,
    msg: EditorMsg,
) -> Option<Cmd> {
    match msg {
        EditorMsg::Activated { key, text } => {
            let skipped = session.activate(&key, &text);
            match skipped.len() {
                0 => None,
                1 => Some(Cmd::warning(&skipped[0])),
                n => Some(Cmd::ShowWarning(format!(
                    "Skipped {} stored highlights for {} that no longer fit the document",
                    n, key
                ))),
            }
        }

        EditorMsg::SelectionChanged(selection) => {
            session.set_selection(selection);
            None
        }
    }
}

//! Document change and close handlers

use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::persistence::Storage;
use crate::render::Renderer;
use crate::session::Session;

/// Handle document messages (edits, close)
pub fn update_document<R: Renderer, S: Storage>(
    session: &mut Session<R, S>,
    msg: DocumentMsg,
) -> Option<Cmd> {
    match msg {
        DocumentMsg::Changed(batch) => {
            // A pending pick's range is stale once its document moves
            let cancelled = session.cancel_pick_for(&batch.key);
            if cancelled.is_some() {
                tracing::debug!(key = %batch.key, "edit cancelled pending color pick");
            }

            if session.apply_edits(&batch.key, &batch.changes).is_none() {
                tracing::trace!(key = %batch.key, "edit touched no highlights");
            }

            cancelled.map(Cmd::HideColorPicker)
        }

        DocumentMsg::Closed(key) => session.close(&key).map(Cmd::HideColorPicker),
    }
}

//! Color picker answer handlers
//!
//! Answers carry the token handed out with `Cmd::ShowColorPicker`; answers
//! for a pick that already resolved are ignored.

use crate::commands::Cmd;
use crate::messages::PickerMsg;
use crate::persistence::Storage;
use crate::render::Renderer;
use crate::session::Session;

/// Handle picker messages
pub fn update_picker<R: Renderer, S: Storage>(
    session: &mut Session<R, S>,
    msg: PickerMsg,
) -> Option<Cmd> {
    match msg {
        PickerMsg::Chosen { token, index } => {
            let pending = session.take_pick(token)?;
            let hide = Cmd::HideColorPicker(token);
            match session.config.color(index) {
                Ok(color) => {
                    session.paint(&pending.key, pending.range, &color);
                    Some(hide)
                }
                Err(e) => Some(Cmd::batch(vec![hide, Cmd::warning(&e)])),
            }
        }

        PickerMsg::Cancelled(token) => {
            let pending = session.take_pick(token)?;
            tracing::debug!(?token, key = %pending.key, "color pick cancelled");
            Some(Cmd::HideColorPicker(token))
        }

        PickerMsg::TimedOut(token) => {
            let pending = session.take_pick(token)?;
            tracing::debug!(?token, key = %pending.key, "color pick timed out");
            Some(Cmd::HideColorPicker(token))
        }
    }
}

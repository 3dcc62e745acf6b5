//! Highlight command handlers
//!
//! Commands act on the active editor's selection. Without an active editor
//! they do nothing; user errors come back as warnings.

use crate::commands::{Cmd, ColorChoice};
use crate::error::HighlightError;
use crate::messages::HighlightMsg;
use crate::model::{DocumentKey, Range};
use crate::persistence::Storage;
use crate::render::Renderer;
use crate::session::Session;

/// Handle highlight commands
pub fn update_highlight<R: Renderer, S: Storage>(
    session: &mut Session<R, S>,
    msg: HighlightMsg,
) -> Option<Cmd> {
    let Some((key, range)) = active_target(session) else {
        tracing::debug!(?msg, "highlight command without an active editor");
        return None;
    };

    // PickColor reports its own busy state
    if !matches!(msg, HighlightMsg::PickColor) && session.pending_pick().is_some() {
        return Some(Cmd::warning(&HighlightError::PickerBusy));
    }

    let result = match msg {
        HighlightMsg::ApplyColor(index) => apply_color(session, &key, range, index),
        HighlightMsg::ClearSelection => clear_selection(session, &key, range),
        HighlightMsg::ClearAll => {
            session.clear_document(&key);
            Ok(None)
        }
        HighlightMsg::PickColor => pick_color(session, &key, range),
    };

    result.unwrap_or_else(|e| {
        tracing::debug!(%key, error = %e, "highlight command refused");
        Some(Cmd::warning(&e))
    })
}

fn active_target<R: Renderer, S: Storage>(
    session: &Session<R, S>,
) -> Option<(DocumentKey, Range)> {
    session
        .active()
        .map(|active| (active.key.clone(), active.selection.range()))
}

fn apply_color<R: Renderer, S: Storage>(
    session: &mut Session<R, S>,
    key: &DocumentKey,
    range: Range,
    index: usize,
) -> Result<Option<Cmd>, HighlightError> {
    if range.is_empty() {
        return Err(HighlightError::InvalidSelection);
    }
    let color = session.config.color(index)?;
    session.paint(key, range, &color);
    Ok(None)
}

fn clear_selection<R: Renderer, S: Storage>(
    session: &mut Session<R, S>,
    key: &DocumentKey,
    range: Range,
) -> Result<Option<Cmd>, HighlightError> {
    if range.is_empty() {
        return Err(HighlightError::InvalidSelection);
    }
    session.clear_range(key, range);
    Ok(None)
}

fn pick_color<R: Renderer, S: Storage>(
    session: &mut Session<R, S>,
    key: &DocumentKey,
    range: Range,
) -> Result<Option<Cmd>, HighlightError> {
    let token = session.begin_pick(key, range)?;
    tracing::debug!(%key, %range, ?token, "color pick started");
    Ok(Some(Cmd::ShowColorPicker {
        token,
        choices: ColorChoice::from_config(&session.config),
        timeout_ms: session.config.picker_timeout_ms,
    }))
}

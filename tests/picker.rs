//! Color pick flow: show, answer, cancel, time out

mod common;

use common::{active_session, color, doc, edit, paint, pos, ranges, select, span, TestSession};
use tint::commands::Cmd;
use tint::highlight::TextChange;
use tint::messages::{DocumentMsg, HighlightMsg, Msg, PickerMsg};
use tint::session::PickToken;
use tint::update::update;

/// Start a pick over `range`, returning its token
fn start_pick(session: &mut TestSession, range: tint::model::Range) -> PickToken {
    select(session, range);
    match update(session, Msg::Highlight(HighlightMsg::PickColor)) {
        Some(Cmd::ShowColorPicker { token, .. }) => token,
        other => panic!("Expected ShowColorPicker, got {:?}", other),
    }
}

#[test]
fn test_pick_offers_every_configured_color() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    select(&mut session, span(0, 0, 5));

    let cmd = update(&mut session, Msg::Highlight(HighlightMsg::PickColor));

    let (choices, timeout_ms) = match cmd {
        Some(Cmd::ShowColorPicker {
            choices,
            timeout_ms,
            ..
        }) => (choices, timeout_ms),
        other => panic!("Expected ShowColorPicker, got {:?}", other),
    };
    assert_eq!(timeout_ms, 15_000);
    assert_eq!(choices.len(), 6);
    assert_eq!(choices[2].index, 3);
    assert_eq!(choices[2].label, "Color 3");
    assert_eq!(choices[2].color.as_str(), color(3));
}

#[test]
fn test_chosen_color_paints_picked_range() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    let token = start_pick(&mut session, span(1, 2, 8));

    // Selection moving while the picker is open does not change the target
    select(&mut session, span(5, 0, 1));
    assert!(session.highlights(&key).is_empty());

    let cmd = update(
        &mut session,
        Msg::Picker(PickerMsg::Chosen { token, index: 3 }),
    );

    assert_eq!(cmd, Some(Cmd::HideColorPicker(token)));
    assert_eq!(ranges(&session, &key), vec![(span(1, 2, 8), color(3))]);
    assert!(session.pending_pick().is_none());
}

#[test]
fn test_cancel_leaves_highlights_unchanged() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    paint(&mut session, span(0, 0, 10), 1);
    let before = ranges(&session, &key);
    let created = session.renderer().created_count();

    let token = start_pick(&mut session, span(0, 2, 4));
    let cmd = update(&mut session, Msg::Picker(PickerMsg::Cancelled(token)));

    assert_eq!(cmd, Some(Cmd::HideColorPicker(token)));
    assert_eq!(ranges(&session, &key), before);
    assert_eq!(session.renderer().created_count(), created);
}

#[test]
fn test_timeout_leaves_highlights_unchanged() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    let token = start_pick(&mut session, span(0, 2, 4));

    let cmd = update(&mut session, Msg::Picker(PickerMsg::TimedOut(token)));

    assert_eq!(cmd, Some(Cmd::HideColorPicker(token)));
    assert!(session.highlights(&key).is_empty());
    assert!(session.pending_pick().is_none());
}

#[test]
fn test_late_answer_after_timeout_is_ignored() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    let token = start_pick(&mut session, span(0, 2, 4));
    update(&mut session, Msg::Picker(PickerMsg::TimedOut(token)));

    let cmd = update(
        &mut session,
        Msg::Picker(PickerMsg::Chosen { token, index: 1 }),
    );

    assert_eq!(cmd, None);
    assert!(session.highlights(&key).is_empty());
}

#[test]
fn test_stale_timeout_does_not_cancel_newer_pick() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    let first = start_pick(&mut session, span(0, 2, 4));
    update(&mut session, Msg::Picker(PickerMsg::Cancelled(first)));
    let second = start_pick(&mut session, span(0, 6, 9));
    assert_ne!(first, second);

    assert_eq!(
        update(&mut session, Msg::Picker(PickerMsg::TimedOut(first))),
        None
    );
    assert_eq!(session.pending_pick().map(|p| p.token), Some(second));

    update(
        &mut session,
        Msg::Picker(PickerMsg::Chosen {
            token: second,
            index: 2,
        }),
    );
    assert_eq!(ranges(&session, &key), vec![(span(0, 6, 9), color(2))]);
}

#[test]
fn test_commands_refused_while_pick_pending() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    start_pick(&mut session, span(0, 2, 4));

    let busy = Some(Cmd::ShowWarning("A color choice is already pending".into()));
    assert_eq!(paint(&mut session, span(1, 0, 4), 1), busy);
    assert_eq!(
        update(&mut session, Msg::Highlight(HighlightMsg::ClearAll)),
        busy
    );
    assert_eq!(
        update(&mut session, Msg::Highlight(HighlightMsg::PickColor)),
        busy
    );
    assert!(session.highlights(&key).is_empty());
}

#[test]
fn test_pick_needs_a_selection() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    select(&mut session, span(0, 3, 3));

    let cmd = update(&mut session, Msg::Highlight(HighlightMsg::PickColor));

    assert_eq!(
        cmd,
        Some(Cmd::ShowWarning("Please select text to highlight".into()))
    );
    assert!(session.pending_pick().is_none());
}

#[test]
fn test_invalid_choice_hides_picker_and_warns() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    let token = start_pick(&mut session, span(0, 2, 4));

    let cmd = update(
        &mut session,
        Msg::Picker(PickerMsg::Chosen { token, index: 9 }),
    )
    .unwrap();

    assert_eq!(
        cmd,
        Cmd::Batch(vec![
            Cmd::HideColorPicker(token),
            Cmd::ShowWarning("Color 9 not available. Available colors: 1-6".into()),
        ])
    );
    assert!(session.highlights(&key).is_empty());
    assert!(session.pending_pick().is_none());
}

#[test]
fn test_edit_cancels_pending_pick() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    let token = start_pick(&mut session, span(0, 2, 4));

    let cmd = edit(&mut session, &key, vec![TextChange::insert(pos(0, 0), "xx")]);
    assert_eq!(cmd, Some(Cmd::HideColorPicker(token)));

    let late = update(
        &mut session,
        Msg::Picker(PickerMsg::Chosen { token, index: 1 }),
    );
    assert_eq!(late, None);
    assert!(session.highlights(&key).is_empty());
}

#[test]
fn test_edit_to_other_document_keeps_pick() {
    let a = doc("a.txt");
    let b = doc("b.txt");
    let mut session = active_session(&a);
    let token = start_pick(&mut session, span(0, 2, 4));

    assert_eq!(
        edit(&mut session, &b, vec![TextChange::insert(pos(0, 0), "xx")]),
        None
    );
    assert_eq!(session.pending_pick().map(|p| p.token), Some(token));
}

#[test]
fn test_close_cancels_pending_pick() {
    let key = doc("a.txt");
    let mut session = active_session(&key);
    let token = start_pick(&mut session, span(0, 2, 4));

    let cmd = update(&mut session, Msg::Document(DocumentMsg::Closed(key.clone())));

    assert_eq!(cmd, Some(Cmd::HideColorPicker(token)));
    assert!(session.pending_pick().is_none());
}

//! Integration tests driving the timeline editor against a live model.

use segline_core::EngineConfig;
use segline_timeline::{EditCommand, TrimRange, UndoStack};
use segline_ui::{EditorAction, TimelineEditor, TimelineScale, TrimEdge};

use crate::fixtures::three_clip_model;

/// Editor at the default 40 px/s, scrolled to the start.
fn editor() -> TimelineEditor {
    let mut editor = TimelineEditor::new(&EngineConfig::default());
    editor.set_viewport_width(800.0);
    editor
}

#[test]
fn fit_to_width_uses_viewport_minus_margin() {
    let mut scale = TimelineScale::from_config(&EngineConfig::default());
    scale.fit_to_width(800.0, 40.0);
    assert_eq!(scale.pixels_per_second(), 19.0);
    assert_eq!(scale.scroll_px(), 0.0);
}

#[test]
fn left_edge_drag_previews_then_commits_trim() {
    let mut model = three_clip_model();
    let mut undo = UndoStack::new(10);
    let mut editor = editor();
    let clip = model.clips()[0].clone();

    assert!(editor.begin_trim(&clip, TrimEdge::Left, 0.0));
    // 40 px at 40 px/s is one second.
    match editor.drag_to(model.clips(), 40.0) {
        Some(EditorAction::TrimPreview { segment_id, trim }) => {
            assert_eq!(segment_id, clip.id());
            assert_eq!(trim, TrimRange::new(1.0, 0.0));
            model.set_trim(segment_id, trim);
        }
        other => panic!("expected trim preview, got {other:?}"),
    }
    assert_eq!(model.clips()[1].cumulative_start, 4.0);

    match editor.release() {
        Some(EditorAction::TrimCommit {
            segment_id,
            before,
            after,
        }) => {
            assert_eq!(before, TrimRange::NONE);
            assert_eq!(after, TrimRange::new(1.0, 0.0));
            undo.push(EditCommand::SetTrim {
                segment_id,
                before,
                after,
            });
        }
        other => panic!("expected trim commit, got {other:?}"),
    }
    assert!(editor.gesture().is_idle());

    undo.undo().unwrap().apply(&mut model);
    assert_eq!(model.total_duration(), 12.0);
}

#[test]
fn right_edge_drag_stops_at_minimum_length() {
    let model = three_clip_model();
    let mut editor = editor();
    // Second clip: 3 s starting at 5 s, right edge at 320 px.
    let clip = model.clips()[1].clone();

    editor.begin_trim(&clip, TrimEdge::Right, 320.0);
    editor.drag_to(model.clips(), 0.0);
    match editor.release() {
        Some(EditorAction::TrimCommit { after, .. }) => {
            assert_eq!(after.trim_in, 0.0);
            assert_eq!(after.trim_out, 2.5);
        }
        other => panic!("expected trim commit, got {other:?}"),
    }
}

#[test]
fn body_drag_reorders_past_last_clip() {
    let mut model = three_clip_model();
    let mut editor = editor();
    let order = model.order().to_vec();
    let clip = model.clips()[0].clone();

    assert!(editor.begin_reorder(&clip, 0));
    // Past the last clip's midpoint (10 s = 400 px).
    assert_eq!(editor.drag_to(model.clips(), 470.0), None);

    match editor.release() {
        Some(EditorAction::Reorder { segment_id, gap }) => {
            assert_eq!(gap, 3);
            model.reorder(segment_id, gap);
        }
        other => panic!("expected reorder, got {other:?}"),
    }
    assert_eq!(model.order(), &[order[1], order[2], order[0]]);
    assert_eq!(model.clips()[2].cumulative_start, 7.0);
}

#[test]
fn body_drag_released_in_place_is_not_an_edit() {
    let model = three_clip_model();
    let mut editor = editor();
    let clip = model.clips()[1].clone();

    editor.begin_reorder(&clip, 1);
    // Between the first and second midpoints: gap 1, the clip's own slot.
    editor.drag_to(model.clips(), 200.0);
    assert_eq!(editor.release(), None);
}

#[test]
fn clicking_a_clip_selects_and_seeks_to_its_start() {
    let model = three_clip_model();
    let mut editor = editor();
    let clip = &model.clips()[2];

    let actions = editor.click_clip(clip);
    assert_eq!(
        actions,
        vec![
            EditorAction::SelectClip(clip.id()),
            EditorAction::Seek(8.0)
        ]
    );
    assert_eq!(editor.selected(), Some(clip.id()));
}

#[test]
fn follow_playhead_pages_when_playing_only() {
    let mut editor = editor();
    // 19 s at 40 px/s is 760 px, inside the 80 px right margin.
    editor.follow_playhead(19.0, false);
    assert_eq!(editor.scale().scroll_px(), 0.0);

    editor.follow_playhead(19.0, true);
    assert_eq!(editor.scale().scroll_px(), 760.0 - 80.0);
}

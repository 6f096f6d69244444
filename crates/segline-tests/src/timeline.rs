//! Integration tests for the clip model and the editable timeline.

use segline_core::{Segment, SegmentStatus, MIN_CLIP_LENGTH};
use segline_timeline::{
    compute_clips, reconcile_order, total_duration, EditCommand, TimelineFile, TimelineModel,
    TrimMap, TrimRange, UndoStack,
};

use crate::fixtures::{document, three_clip_model, three_clip_segments};

#[test]
fn three_clips_lay_out_back_to_back() {
    let model = three_clip_model();
    let starts: Vec<f64> = model.clips().iter().map(|c| c.cumulative_start).collect();
    assert_eq!(starts, vec![0.0, 5.0, 8.0]);
    assert_eq!(model.total_duration(), 12.0);

    let markers = model.scene_markers();
    assert_eq!(markers.len(), 2);
    assert_eq!((markers[0].scene_number, markers[0].time), (1, 0.0));
    assert_eq!((markers[1].scene_number, markers[1].time), (2, 8.0));
}

#[test]
fn trimmed_clip_shifts_everything_after_it() {
    let mut model = three_clip_model();
    let first = model.order()[0];
    model.set_trim(first, TrimRange::new(1.0, 0.5));

    let clips = model.clips();
    assert_eq!(clips[0].effective_duration, 3.5);
    assert_eq!(clips[0].source_in(), 1.0);
    assert_eq!(clips[0].source_out(), 4.5);
    assert_eq!(clips[1].cumulative_start, 3.5);
    assert_eq!(model.total_duration(), 10.5);
}

#[test]
fn over_trim_clamps_to_minimum_length() {
    let mut model = three_clip_model();
    let first = model.order()[0];
    let stored = model.set_trim(first, TrimRange::new(4.0, 3.0)).unwrap();

    assert!(stored.trim_in + stored.trim_out <= 5.0 - MIN_CLIP_LENGTH + 1e-12);
    assert_eq!(model.clips()[0].effective_duration, MIN_CLIP_LENGTH);
}

#[test]
fn dropping_into_own_gaps_changes_nothing() {
    let mut model = three_clip_model();
    let before = model.order().to_vec();
    let middle = before[1];

    assert_eq!(model.reorder(middle, 1), None);
    assert_eq!(model.reorder(middle, 2), None);
    assert_eq!(model.order(), before.as_slice());

    let moved = model.reorder(middle, 0).unwrap();
    assert_eq!(moved, vec![before[1], before[0], before[2]]);
    assert_eq!(model.reorder(middle, 0), None);
}

#[test]
fn reorder_undo_restores_layout() {
    let mut model = three_clip_model();
    let mut undo = UndoStack::new(10);
    let before = model.order().to_vec();
    let last = before[2];

    let after = model.reorder(last, 0).unwrap();
    undo.push(EditCommand::SetOrder {
        before: before.clone(),
        after,
    });
    assert_eq!(model.clips()[0].segment.scene_number, 2);
    assert_eq!(model.scene_markers().len(), 2);

    undo.undo().unwrap().apply(&mut model);
    assert_eq!(model.order(), before.as_slice());
    assert_eq!(model.clips()[2].cumulative_start, 8.0);
}

#[test]
fn unfinished_segments_stay_off_the_timeline() {
    let mut segments = three_clip_segments();
    segments.insert(1, Segment::new(1, 2, 6.0));
    let mut failed = Segment::done(2, 1, 2.0, "https://cdn.example/x.mp4");
    failed.status = SegmentStatus::Failed;
    segments.push(failed);

    let order: Vec<_> = segments.iter().map(|s| s.id).collect();
    let clips = compute_clips(&segments, &order, &TrimMap::new());
    assert_eq!(clips.len(), 3);
    assert_eq!(total_duration(&clips), 12.0);
}

#[test]
fn saved_order_is_reconciled_against_current_segments() {
    let segments = three_clip_segments();
    let stale = Segment::done(9, 0, 1.0, "https://cdn.example/gone.mp4").id;
    let saved = vec![segments[2].id, stale, segments[0].id, segments[2].id];

    let order = reconcile_order(&saved, &segments);
    assert_eq!(order, vec![segments[2].id, segments[0].id]);
}

#[test]
fn subset_order_leaves_other_segments_off_the_timeline() {
    let segments = three_clip_segments();
    let order = vec![segments[2].id, segments[0].id];
    let model = TimelineModel::new(segments.clone(), &order, TrimMap::new());

    assert_eq!(model.order(), order.as_slice());
    assert_eq!(model.clips().len(), 2);
    assert_eq!(model.clips()[0].id(), segments[2].id);
    assert_eq!(
        model.total_duration(),
        segments[2].source_duration + segments[0].source_duration
    );

    let mut doc = document(segments.clone());
    doc.order = order.clone();
    assert_eq!(doc.model().total_duration(), 9.0);
}

#[test]
fn segment_refresh_appends_only_new_results() {
    let mut segments = three_clip_segments();
    let pending = Segment::new(3, 0, 2.0);
    segments.push(pending.clone());
    let mut model = TimelineModel::new(segments.clone(), &[segments[1].id], TrimMap::new());

    let mut refreshed = segments.clone();
    let last = refreshed.len() - 1;
    refreshed[last].status = SegmentStatus::Done;
    refreshed[last].media_url = Some("https://cdn.example/late.mp4".into());
    model.set_segments(refreshed);

    assert_eq!(model.order(), &[segments[1].id, pending.id]);
    assert_eq!(model.total_duration(), 5.0);
}

#[test]
fn manifest_round_trip_preserves_edits() {
    let mut doc = document(three_clip_segments());
    let mut model = doc.model();
    let first = model.order()[0];
    let last = model.order()[2];
    model.reorder(last, 0);
    model.set_trim(first, TrimRange::new(0.5, 0.5));
    doc.update_from(&model);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("episode.json");
    TimelineFile::new(doc).save_to_file(&path).unwrap();

    let loaded = TimelineFile::load_from_file(&path).unwrap().timeline;
    let reloaded = loaded.model();
    assert_eq!(reloaded.order(), model.order());
    assert_eq!(reloaded.trim_for(first), TrimRange::new(0.5, 0.5));
    assert_eq!(reloaded.total_duration(), model.total_duration());
}

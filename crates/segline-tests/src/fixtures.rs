//! Shared episode fixtures.

use segline_core::{Segment, SegmentId};
use segline_timeline::{natural_order, TimelineDocument, TimelineModel};

/// Three finished segments of 5 s, 3 s and 4 s; the first two in scene 1.
pub fn three_clip_segments() -> Vec<Segment> {
    vec![
        Segment::done(1, 0, 5.0, "https://cdn.example/s1-0.mp4"),
        Segment::done(1, 1, 3.0, "https://cdn.example/s1-1.mp4"),
        Segment::done(2, 0, 4.0, "https://cdn.example/s2-0.mp4"),
    ]
}

pub fn three_clip_model() -> TimelineModel {
    TimelineModel::from_segments(three_clip_segments())
}

pub fn document(segments: Vec<Segment>) -> TimelineDocument {
    let order: Vec<SegmentId> = natural_order(&segments);
    TimelineDocument {
        title: "Night Market".into(),
        episode_number: 2,
        episode_label: "Episode 2".into(),
        segments,
        order,
        ..Default::default()
    }
}

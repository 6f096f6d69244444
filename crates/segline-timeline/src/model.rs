//! Editable timeline state held in memory.
//!
//! The model is updated optimistically by the editor; the caller persists the
//! resulting order/trim and may feed fresh segments back in at any time.

use segline_core::{Segment, SegmentId, MIN_CLIP_LENGTH};
use tracing::debug;

use crate::clip::{self, compute_clips_with, Clip};
use crate::order::{self, merge_new_segments, natural_order, reconcile_order};
use crate::scene::{scene_markers, SceneMarker};
use crate::trim::{TrimMap, TrimRange};

/// Segments plus the caller-held order and trim values, with the derived clips.
#[derive(Debug, Clone)]
pub struct TimelineModel {
    segments: Vec<Segment>,
    order: Vec<SegmentId>,
    trim: TrimMap,
    min_clip_length: f64,
    /// Recomputed after every mutation.
    clips: Vec<Clip>,
}

impl TimelineModel {
    /// Build a model from caller state.
    ///
    /// The order is taken as given apart from unknown, duplicate, or unplayable
    /// IDs; segments it leaves out are not on the timeline.
    pub fn new(segments: Vec<Segment>, order: &[SegmentId], trim: TrimMap) -> Self {
        Self::with_min_clip_length(segments, order, trim, MIN_CLIP_LENGTH)
    }

    /// Build a model with the segments in their natural order and no trims.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let order = natural_order(&segments);
        Self::new(segments, &order, TrimMap::new())
    }

    pub fn with_min_clip_length(
        segments: Vec<Segment>,
        order: &[SegmentId],
        trim: TrimMap,
        min_clip_length: f64,
    ) -> Self {
        let order = reconcile_order(order, &segments);
        let mut model = Self {
            segments,
            order,
            trim,
            min_clip_length,
            clips: Vec::new(),
        };
        model.recompute();
        model
    }

    fn recompute(&mut self) {
        self.clips = compute_clips_with(&self.segments, &self.order, &self.trim, self.min_clip_length);
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn order(&self) -> &[SegmentId] {
        &self.order
    }

    pub fn trim_map(&self) -> &TrimMap {
        &self.trim
    }

    pub fn trim_for(&self, id: SegmentId) -> TrimRange {
        self.trim.get(&id).copied().unwrap_or_default()
    }

    pub fn min_clip_length(&self) -> f64 {
        self.min_clip_length
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip(&self, id: SegmentId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id() == id)
    }

    pub fn total_duration(&self) -> f64 {
        clip::total_duration(&self.clips)
    }

    pub fn clip_at_time(&self, time: f64) -> Option<&Clip> {
        clip::clip_at_time(&self.clips, time)
    }

    pub fn scene_markers(&self) -> Vec<SceneMarker> {
        scene_markers(&self.clips)
    }

    // ── Mutations ──────────────────────────────────────────────

    /// Replace the segment list (e.g. after the store reports new results).
    ///
    /// Segments that became playable since the last list are appended to the
    /// order; everything else keeps the caller's order.
    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        self.order = merge_new_segments(&self.order, &self.segments, &segments);
        self.segments = segments;
        self.recompute();
    }

    /// Replace the order wholesale. Returns the order actually stored.
    pub fn set_order(&mut self, order: &[SegmentId]) -> &[SegmentId] {
        self.order = reconcile_order(order, &self.segments);
        self.recompute();
        &self.order
    }

    /// Move `dragged` into `gap`. Returns the new order when it changed.
    pub fn reorder(&mut self, dragged: SegmentId, gap: usize) -> Option<Vec<SegmentId>> {
        if order::is_noop_drop(&self.order, dragged, gap) {
            return None;
        }
        self.order = order::move_to_gap(&self.order, dragged, gap);
        self.recompute();
        debug!("Reordered {} into gap {}", dragged, gap);
        Some(self.order.clone())
    }

    /// Store a trim for `id`, clamped to the segment's length.
    ///
    /// Returns the stored value, or `None` for an unknown segment.
    pub fn set_trim(&mut self, id: SegmentId, trim: TrimRange) -> Option<TrimRange> {
        let duration = self.segment(id)?.source_duration;
        let clamped = trim.clamped(duration, self.min_clip_length);
        if clamped != trim {
            debug!("Clamped trim for {}: {:?} -> {:?}", id, trim, clamped);
        }
        if clamped.is_none() {
            self.trim.remove(&id);
        } else {
            self.trim.insert(id, clamped);
        }
        self.recompute();
        Some(clamped)
    }
}

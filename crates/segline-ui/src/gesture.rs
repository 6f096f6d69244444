//! Pointer gestures on the clip lane.
//!
//! Trim and reorder drags are modal: only one gesture runs at a time and
//! drop gaps are inert while a trim is in progress. Releasing the pointer
//! commits whatever value the last move produced.

use egui::{CursorIcon, Pos2, Rect, Vec2};
use segline_core::SegmentId;
use segline_timeline::{Clip, DropPosition, TrimRange};

use crate::scale::TimelineScale;

/// Which edge of a clip is being trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEdge {
    Left,
    Right,
}

/// Hit test a position against a clip's trim handles.
pub fn hit_test_trim_handle(clip_rect: Rect, pos: Pos2, handle_width: f32) -> Option<TrimEdge> {
    if !clip_rect.contains(pos) {
        return None;
    }
    // Narrow clips split evenly between the two handles.
    let handle_width = handle_width.min(clip_rect.width() / 2.0);

    let left_handle = Rect::from_min_size(
        clip_rect.min,
        Vec2::new(handle_width, clip_rect.height()),
    );
    if left_handle.contains(pos) {
        return Some(TrimEdge::Left);
    }

    let right_handle = Rect::from_min_size(
        Pos2::new(clip_rect.right() - handle_width, clip_rect.top()),
        Vec2::new(handle_width, clip_rect.height()),
    );
    if right_handle.contains(pos) {
        return Some(TrimEdge::Right);
    }

    None
}

pub fn trim_cursor(edge: TrimEdge) -> CursorIcon {
    match edge {
        TrimEdge::Left => CursorIcon::ResizeWest,
        TrimEdge::Right => CursorIcon::ResizeEast,
    }
}

/// An edge drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimDrag {
    pub segment_id: SegmentId,
    pub edge: TrimEdge,
    source_duration: f64,
    min_clip_length: f64,
    start_x: f32,
    original: TrimRange,
    current: TrimRange,
}

impl TrimDrag {
    pub fn new(clip: &Clip, edge: TrimEdge, start_x: f32, min_clip_length: f64) -> Self {
        Self {
            segment_id: clip.id(),
            edge,
            source_duration: clip.segment.source_duration,
            min_clip_length,
            start_x,
            original: clip.trim,
            current: clip.trim,
        }
    }

    pub fn original(&self) -> TrimRange {
        self.original
    }

    pub fn current(&self) -> TrimRange {
        self.current
    }

    /// Follow the pointer. The left edge trims more as the pointer moves
    /// right; the right edge trims more as it moves left.
    pub fn update(&mut self, pointer_x: f32, pixels_per_second: f32) -> TrimRange {
        let delta = ((pointer_x - self.start_x) / pixels_per_second) as f64;
        self.current = match self.edge {
            TrimEdge::Left => self.original.with_trim_in(
                self.original.trim_in + delta,
                self.source_duration,
                self.min_clip_length,
            ),
            TrimEdge::Right => self.original.with_trim_out(
                self.original.trim_out - delta,
                self.source_duration,
                self.min_clip_length,
            ),
        };
        self.current
    }

    pub fn has_changed(&self) -> bool {
        self.current != self.original
    }
}

/// A clip being dragged to a new position.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderDrag {
    pub segment_id: SegmentId,
    pub origin_index: usize,
    /// Gap the clip would land in if released now.
    pub hover_gap: Option<usize>,
}

impl ReorderDrag {
    pub fn new(segment_id: SegmentId, origin_index: usize) -> Self {
        Self {
            segment_id,
            origin_index,
            hover_gap: None,
        }
    }

    /// Whether releasing now changes the order.
    pub fn is_move(&self) -> bool {
        match self.hover_gap {
            Some(gap) => gap != self.origin_index && gap != self.origin_index + 1,
            None => false,
        }
    }
}

/// The single active pointer gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Trim(TrimDrag),
    Reorder(ReorderDrag),
    /// Dragging along the ruler, seeking continuously.
    Scrub,
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_trimming(&self) -> bool {
        matches!(self, Self::Trim(_))
    }

    /// Drop gaps accept a reorder only while no trim is running.
    pub fn drop_zones_enabled(&self) -> bool {
        !self.is_trimming()
    }
}

/// Drop position nearest to viewport offset `x`: a clip's left half drops
/// before it, its right half after it, and anything past the lane at the end.
pub fn drop_position_at_x(clips: &[Clip], scale: &TimelineScale, x: f32) -> DropPosition {
    let time = scale.x_to_time(x);
    let k = clips.partition_point(|clip| clip.cumulative_start + clip.effective_duration / 2.0 <= time);
    match k.checked_sub(1).map(|i| &clips[i]) {
        None => clips.first().map_or(DropPosition::End, |c| DropPosition::Before(c.id())),
        Some(last) if k == clips.len() && time >= last.end() => DropPosition::End,
        Some(clip) => DropPosition::After(clip.id()),
    }
}

/// Viewport offset of a gap's insertion line.
pub fn gap_x(clips: &[Clip], scale: &TimelineScale, gap: usize) -> f32 {
    match clips.get(gap) {
        Some(clip) => scale.time_to_x(clip.cumulative_start),
        None => scale.time_to_x(clips.last().map(Clip::end).unwrap_or(0.0)),
    }
}

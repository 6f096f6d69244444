//! Clip Model: the derived, gap-free layout of the timeline.
//!
//! Clips are recomputed from `(segments, order, trim)` on every change and are
//! never edited in place.

use segline_core::{Segment, SegmentId, MIN_CLIP_LENGTH};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::trim::{TrimMap, TrimRange};

/// A segment placed on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub segment: Segment,
    /// Index of this clip in the computed clip list.
    pub position: usize,
    /// Trim applied to the segment (already clamped).
    pub trim: TrimRange,
    /// Timeline time at which this clip starts.
    pub cumulative_start: f64,
    /// Length of the clip on the timeline.
    pub effective_duration: f64,
}

impl Clip {
    pub fn id(&self) -> SegmentId {
        self.segment.id
    }

    /// Timeline time at which this clip ends (exclusive).
    pub fn end(&self) -> f64 {
        self.cumulative_start + self.effective_duration
    }

    /// Source in point in seconds.
    pub fn source_in(&self) -> f64 {
        self.trim.source_in()
    }

    /// Source out point in seconds.
    pub fn source_out(&self) -> f64 {
        self.trim.source_out(self.segment.source_duration)
    }
}

/// Lay out `order` using the default minimum clip length.
pub fn compute_clips(segments: &[Segment], order: &[SegmentId], trim: &TrimMap) -> Vec<Clip> {
    compute_clips_with(segments, order, trim, MIN_CLIP_LENGTH)
}

/// Lay out `order` back to back.
///
/// IDs that do not resolve to a playable segment, and repeated IDs, are
/// skipped. Trim values are clamped before use.
pub fn compute_clips_with(
    segments: &[Segment],
    order: &[SegmentId],
    trim: &TrimMap,
    min_clip_length: f64,
) -> Vec<Clip> {
    let by_id: HashMap<SegmentId, &Segment> = segments.iter().map(|s| (s.id, s)).collect();
    let mut seen = HashSet::with_capacity(order.len());
    let mut clips: Vec<Clip> = Vec::with_capacity(order.len());
    let mut cursor = 0.0;

    for id in order {
        let Some(segment) = by_id.get(id) else {
            debug!("Dropping unknown segment {} from timeline order", id);
            continue;
        };
        if !segment.is_playable() {
            debug!("Dropping non-playable segment {} from timeline order", id);
            continue;
        }
        if !seen.insert(*id) {
            debug!("Dropping duplicate segment {} from timeline order", id);
            continue;
        }

        let requested = trim.get(id).copied().unwrap_or_default();
        let trim_range = requested.clamped(segment.source_duration, min_clip_length);
        if trim_range != requested {
            debug!(
                "Clamped trim for {}: {:?} -> {:?}",
                id, requested, trim_range
            );
        }
        let effective = trim_range.effective_duration(segment.source_duration, min_clip_length);

        clips.push(Clip {
            segment: (*segment).clone(),
            position: clips.len(),
            trim: trim_range,
            cumulative_start: cursor,
            effective_duration: effective,
        });
        cursor += effective;
    }

    clips
}

/// Total timeline length: the end of the last clip, or zero.
pub fn total_duration(clips: &[Clip]) -> f64 {
    clips.last().map(Clip::end).unwrap_or(0.0)
}

/// Index of the clip containing `time`.
///
/// Times before zero map to the first clip and times past the end map to the
/// last; only an empty timeline yields `None`.
pub fn clip_index_at_time(clips: &[Clip], time: f64) -> Option<usize> {
    if clips.is_empty() {
        return None;
    }
    let index = clips.partition_point(|clip| clip.end() <= time);
    Some(index.min(clips.len() - 1))
}

/// The clip containing `time`, clamped to the first/last clip.
pub fn clip_at_time(clips: &[Clip], time: f64) -> Option<&Clip> {
    clip_index_at_time(clips, time).map(|index| &clips[index])
}

/// Resolve a timeline time into `(clip index, offset within clip)`.
///
/// The offset is clamped to the clip's extent.
pub fn locate(clips: &[Clip], time: f64) -> Option<(usize, f64)> {
    let index = clip_index_at_time(clips, time)?;
    let clip = &clips[index];
    let offset = if time.is_finite() {
        (time - clip.cumulative_start).clamp(0.0, clip.effective_duration)
    } else {
        0.0
    };
    Some((index, offset))
}

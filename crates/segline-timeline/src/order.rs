//! Timeline order: which playable segments appear, and in what sequence.

use segline_core::{Segment, SegmentId};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Playable segments in the order the store delivered them.
pub fn natural_order(segments: &[Segment]) -> Vec<SegmentId> {
    segments
        .iter()
        .filter(|s| s.is_playable())
        .map(|s| s.id)
        .collect()
}

/// Validate a caller-held order against the current segment list.
///
/// Known playable IDs keep their position; unknown, duplicate, or
/// no-longer-playable IDs are dropped. Playable segments the caller left out
/// stay out.
pub fn reconcile_order(order: &[SegmentId], segments: &[Segment]) -> Vec<SegmentId> {
    let playable: HashSet<SegmentId> = segments
        .iter()
        .filter(|s| s.is_playable())
        .map(|s| s.id)
        .collect();

    let mut seen = HashSet::with_capacity(order.len());
    let mut result = Vec::with_capacity(order.len().min(playable.len()));
    let mut dropped = 0usize;

    for id in order {
        if playable.contains(id) && seen.insert(*id) {
            result.push(*id);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!("Dropped {} unresolvable entries from timeline order", dropped);
    }

    result
}

/// Reconcile `order` and append segments that became playable since `previous`.
///
/// Only segments that were missing or unplayable in `previous` are appended, in
/// natural order, so clips the caller removed from the order are not restored.
pub fn merge_new_segments(
    order: &[SegmentId],
    previous: &[Segment],
    segments: &[Segment],
) -> Vec<SegmentId> {
    let was_playable: HashSet<SegmentId> = natural_order(previous).into_iter().collect();
    let mut result = reconcile_order(order, segments);
    let mut seen: HashSet<SegmentId> = result.iter().copied().collect();

    let before_append = result.len();
    for id in natural_order(segments) {
        if !was_playable.contains(&id) && seen.insert(id) {
            result.push(id);
        }
    }
    if result.len() > before_append {
        debug!(
            "Appended {} new segments to timeline order",
            result.len() - before_append
        );
    }

    result
}

/// Where a dragged clip is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before(SegmentId),
    After(SegmentId),
    /// Past the last clip.
    End,
}

/// Translate a drop position into a gap index in `0..=order.len()`.
///
/// Gap `k` sits immediately before `order[k]`.
pub fn drop_gap(order: &[SegmentId], position: DropPosition) -> Option<usize> {
    match position {
        DropPosition::Before(id) => order.iter().position(|o| *o == id),
        DropPosition::After(id) => order.iter().position(|o| *o == id).map(|i| i + 1),
        DropPosition::End => Some(order.len()),
    }
}

/// Whether dropping `dragged` into `gap` leaves the order unchanged.
pub fn is_noop_drop(order: &[SegmentId], dragged: SegmentId, gap: usize) -> bool {
    match order.iter().position(|o| *o == dragged) {
        Some(from) => gap == from || gap == from + 1,
        None => true,
    }
}

/// Move `dragged` into `gap`, returning the new order.
///
/// Removing the dragged item shifts later gaps left by one, so a gap after the
/// original index is decremented before reinserting. Dropping into either gap
/// adjacent to the item returns an identical order.
pub fn move_to_gap(order: &[SegmentId], dragged: SegmentId, gap: usize) -> Vec<SegmentId> {
    let mut result = order.to_vec();
    let Some(from) = result.iter().position(|o| *o == dragged) else {
        debug!("Ignoring drop of {} which is not on the timeline", dragged);
        return result;
    };

    let gap = gap.min(result.len());
    let insert_at = if from < gap { gap - 1 } else { gap };
    if insert_at == from {
        return result;
    }

    let item = result.remove(from);
    result.insert(insert_at, item);
    result
}

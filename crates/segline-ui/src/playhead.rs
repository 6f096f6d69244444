//! Playhead placement and viewport follow.

use segline_timeline::Clip;

use crate::scale::TimelineScale;

/// Timeline position of the playhead: the current clip's start plus the time
/// played inside it.
pub fn playhead_time(clips: &[Clip], current_index: Option<usize>, elapsed: f64) -> f64 {
    current_index
        .and_then(|i| clips.get(i))
        .map(|clip| clip.cumulative_start + elapsed.clamp(0.0, clip.effective_duration))
        .unwrap_or(0.0)
}

/// Page-scroll so the playhead stays visible.
///
/// Returns the new scroll offset when the playhead is within `margin_px` of
/// the right edge or left of the viewport; the playhead then sits `margin_px`
/// from the left edge.
pub fn follow_scroll(
    scale: &TimelineScale,
    playhead: f64,
    viewport_width: f32,
    margin_px: f32,
) -> Option<f32> {
    if viewport_width <= 0.0 {
        return None;
    }
    let margin = margin_px.min(viewport_width / 2.0);
    let x = scale.time_to_x(playhead);
    if x > viewport_width - margin || x < 0.0 {
        let absolute = scale.duration_to_width(playhead);
        Some((absolute - margin).max(0.0))
    } else {
        None
    }
}

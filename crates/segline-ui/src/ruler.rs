//! Ruler tick placement.

use crate::scale::TimelineScale;

/// Candidate label intervals in seconds, smallest first.
pub const TICK_LADDER: [f64; 11] = [
    0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0,
];

/// Minor ticks drawn between two labelled ticks.
const MINOR_DIVISIONS: u32 = 5;

/// One labelled ruler tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    pub time: f64,
    /// Viewport pixel offset.
    pub x: f32,
    pub label: String,
}

/// Smallest ladder interval whose on-screen spacing is at least `min_gap_px`.
/// Falls back to the largest interval when even that is too dense.
pub fn tick_interval(pixels_per_second: f32, min_gap_px: f32) -> f64 {
    let pps = pixels_per_second as f64;
    TICK_LADDER
        .iter()
        .copied()
        .find(|interval| interval * pps >= min_gap_px as f64)
        .unwrap_or(TICK_LADDER[TICK_LADDER.len() - 1])
}

/// Label for a tick at `time` seconds: `m:ss`, or `m:ss.s` for half-second steps.
pub fn format_tick_label(time: f64, interval: f64) -> String {
    let tenths = (time * 10.0).round() as u64;
    let minutes = tenths / 600;
    let seconds = (tenths / 10) % 60;
    if interval < 1.0 {
        format!("{}:{:02}.{}", minutes, seconds, tenths % 10)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Labelled ticks visible in a viewport of `width` pixels.
pub fn visible_ticks(scale: &TimelineScale, width: f32, min_gap_px: f32) -> Vec<RulerTick> {
    let interval = tick_interval(scale.pixels_per_second(), min_gap_px);
    let first = (scale.x_to_time(0.0) / interval).floor().max(0.0) as u64;
    let last = (scale.x_to_time(width) / interval).ceil() as u64;

    (first..=last)
        .map(|i| i as f64 * interval)
        .map(|time| RulerTick {
            time,
            x: scale.time_to_x(time),
            label: format_tick_label(time, interval),
        })
        .filter(|tick| tick.x >= -1.0 && tick.x <= width + 1.0)
        .collect()
}

/// Unlabelled minor tick offsets between labelled ticks.
pub fn minor_ticks(scale: &TimelineScale, width: f32, min_gap_px: f32) -> Vec<f32> {
    let interval = tick_interval(scale.pixels_per_second(), min_gap_px) / MINOR_DIVISIONS as f64;
    let first = (scale.x_to_time(0.0) / interval).floor().max(0.0) as u64;
    let last = (scale.x_to_time(width) / interval).ceil() as u64;

    (first..=last)
        .filter(|i| i % MINOR_DIVISIONS as u64 != 0)
        .map(|i| scale.time_to_x(i as f64 * interval))
        .filter(|x| *x >= 0.0 && *x <= width)
        .collect()
}

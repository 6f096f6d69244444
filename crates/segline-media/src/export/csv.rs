//! Per-segment CSV manifest.
//!
//! Double quotes inside a value become single quotes, and a field is wrapped
//! in double quotes only when it contains a comma or line break. The prompt
//! column is always quoted.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use segline_core::{Segment, SegmentId};
use segline_timeline::{effective_duration, TrimMap, TrimRange};
use tracing::debug;

use super::naming::{segment_filename, title_abbreviation};
use super::ExportMeta;

pub const CSV_HEADER: &str = "Filename,Scene,Segment,Duration(s),TrimIn(s),TrimOut(s),EffectiveDur(s),ShotType,Camera,Status,VideoURL,Prompt";

/// Row order for the manifest: segments on the timeline in timeline order,
/// then every other segment in list order.
pub fn export_order<'a>(segments: &'a [Segment], order: &[SegmentId]) -> Vec<&'a Segment> {
    let by_id: HashMap<SegmentId, &Segment> = segments.iter().map(|s| (s.id, s)).collect();
    let mut seen = HashSet::with_capacity(segments.len());
    let mut rows = Vec::with_capacity(segments.len());

    for id in order {
        if let Some(segment) = by_id.get(id) {
            if seen.insert(*id) {
                rows.push(*segment);
            }
        }
    }
    rows.extend(segments.iter().filter(|s| seen.insert(s.id)));
    rows
}

fn escape_field(value: &str) -> String {
    let value = value.replace('"', "'");
    if value.contains([',', '\n', '\r']) {
        format!("\"{}\"", value)
    } else {
        value
    }
}

fn prompt_field(prompt: &str, max_chars: usize) -> String {
    let cleaned: String = prompt
        .chars()
        .take(max_chars)
        .map(|c| match c {
            '\n' | '\r' => ' ',
            '"' => '\'',
            other => other,
        })
        .collect();
    format!("\"{}\"", cleaned)
}

/// Trim and effective duration as the timeline would use them.
fn timing(segment: &Segment, trim: &TrimMap, min_clip_length: f64) -> (TrimRange, f64) {
    let duration = segment.source_duration;
    if !(duration.is_finite() && duration > 0.0) {
        return (TrimRange::NONE, 0.0);
    }
    let range = trim
        .get(&segment.id)
        .copied()
        .unwrap_or_default()
        .clamped(duration, min_clip_length);
    (range, effective_duration(duration, range, min_clip_length))
}

/// Render the manifest. Every segment gets a row, whatever its status.
pub fn build_csv(
    meta: &ExportMeta,
    segments: &[Segment],
    order: &[SegmentId],
    trim: &TrimMap,
) -> String {
    let abbreviation = title_abbreviation(&meta.title);
    let rows = export_order(segments, order);

    let mut out = String::with_capacity(CSV_HEADER.len() + rows.len() * 160);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for segment in &rows {
        let (range, effective) = timing(segment, trim, meta.min_clip_length);
        let duration = if segment.source_duration.is_finite() {
            segment.source_duration.max(0.0)
        } else {
            0.0
        };
        let _ = writeln!(
            out,
            "{},{},{},{:.2},{:.2},{:.2},{:.2},{},{},{},{},{}",
            escape_field(&segment_filename(&abbreviation, meta.episode_number, segment)),
            segment.scene_number,
            segment.index + 1,
            duration,
            range.trim_in,
            range.trim_out,
            effective,
            escape_field(segment.shot.shot_type.as_deref().unwrap_or("")),
            escape_field(segment.shot.camera.as_deref().unwrap_or("")),
            segment.status.as_str(),
            escape_field(segment.media_url_or_empty()),
            prompt_field(&segment.prompt, meta.prompt_max_chars),
        );
    }

    debug!("Built CSV manifest with {} rows", rows.len());
    out
}

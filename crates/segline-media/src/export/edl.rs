//! CMX-style Edit Decision List.
//!
//! ```text
//! TITLE: Night Market - Episode 2
//! FCM: NON-DROP FRAME
//!
//! 001  NM-S02-SC001-SEG001.mp4  V  C  00:00:01:00 00:00:05:00 00:00:00:00 00:00:04:00
//! * FROM CLIP NAME: NM-S02-SC001-SEG001.mp4
//! * SOURCE FILE: https://cdn.example/a.mp4
//! ```

use std::fmt::Write;

use segline_core::{FrameRate, SegmentId, Timecode};
use segline_timeline::Clip;
use tracing::{debug, warn};

use super::naming::{segment_filename, title_abbreviation};
use super::ExportMeta;

/// Record positions further apart than this from the clip layout are reported.
const LAYOUT_DRIFT_TOLERANCE: f64 = 1e-9;

/// One edit in the list. Times are seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct EdlEvent {
    /// 1-based edit number.
    pub number: usize,
    pub segment_id: SegmentId,
    pub clip_name: String,
    pub source_file: String,
    pub source_in: f64,
    pub source_out: f64,
    pub record_in: f64,
    pub record_out: f64,
}

impl EdlEvent {
    pub fn duration(&self) -> f64 {
        self.record_out - self.record_in
    }

    fn write_to(&self, out: &mut String, rate: FrameRate) {
        let _ = writeln!(
            out,
            "{:03}  {}  V  C  {} {} {} {}",
            self.number,
            self.clip_name,
            Timecode::from_seconds(self.source_in, rate),
            Timecode::from_seconds(self.source_out, rate),
            Timecode::from_seconds(self.record_in, rate),
            Timecode::from_seconds(self.record_out, rate),
        );
        let _ = writeln!(out, "* FROM CLIP NAME: {}", self.clip_name);
        if !self.source_file.is_empty() {
            let _ = writeln!(out, "* SOURCE FILE: {}", self.source_file);
        }
        out.push('\n');
    }
}

/// Edit events for clips laid out in timeline order.
///
/// Record-in is a running sum of effective durations, accumulated in the
/// same order the clip layout uses, so it matches each clip's cumulative
/// start exactly.
pub fn edl_events(meta: &ExportMeta, clips: &[Clip]) -> Vec<EdlEvent> {
    let abbreviation = title_abbreviation(&meta.title);
    let mut running = 0.0;

    clips
        .iter()
        .enumerate()
        .map(|(i, clip)| {
            if (running - clip.cumulative_start).abs() > LAYOUT_DRIFT_TOLERANCE {
                warn!(
                    "EDL record-in {:.6}s differs from clip start {:.6}s at event {}",
                    running,
                    clip.cumulative_start,
                    i + 1
                );
            }
            let record_in = running;
            let record_out = record_in + clip.effective_duration;
            running = record_out;

            EdlEvent {
                number: i + 1,
                segment_id: clip.id(),
                clip_name: segment_filename(&abbreviation, meta.episode_number, &clip.segment),
                source_file: clip.segment.media_url_or_empty().to_string(),
                source_in: clip.source_in(),
                source_out: clip.source_out(),
                record_in,
                record_out,
            }
        })
        .collect()
}

fn title_line(meta: &ExportMeta) -> String {
    let title = meta.title.trim();
    let label = meta.episode_label.trim();
    match (title.is_empty(), label.is_empty()) {
        (false, false) => format!("{} - {}", title, label),
        (false, true) => title.to_string(),
        (true, false) => label.to_string(),
        (true, true) => "Untitled".to_string(),
    }
}

/// Render the full EDL document.
pub fn build_edl(meta: &ExportMeta, clips: &[Clip]) -> String {
    let events = edl_events(meta, clips);
    let mut out = String::new();
    let _ = writeln!(out, "TITLE: {}", title_line(meta));
    out.push_str("FCM: NON-DROP FRAME\n\n");
    for event in &events {
        event.write_to(&mut out, meta.frame_rate);
    }
    debug!("Built EDL with {} events", events.len());
    out
}

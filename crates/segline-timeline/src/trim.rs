//! Trim ranges.
//!
//! A trim removes `trim_in` seconds from the head of a segment and `trim_out`
//! seconds from its tail. The remaining clip is never shorter than the minimum
//! clip length.

use segline_core::SegmentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trim values keyed by segment.
pub type TrimMap = HashMap<SegmentId, TrimRange>;

/// Values within this distance of the minimum length snap onto it.
const LENGTH_EPSILON: f64 = 1e-9;

/// Head/tail trim of one segment, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrimRange {
    #[serde(default)]
    pub trim_in: f64,
    #[serde(default)]
    pub trim_out: f64,
}

impl TrimRange {
    /// No trim at either end.
    pub const NONE: Self = Self {
        trim_in: 0.0,
        trim_out: 0.0,
    };

    pub fn new(trim_in: f64, trim_out: f64) -> Self {
        Self { trim_in, trim_out }
    }

    /// Whether both edges are untouched.
    pub fn is_none(&self) -> bool {
        self.trim_in == 0.0 && self.trim_out == 0.0
    }

    /// Source in point (seconds into the media).
    pub fn source_in(&self) -> f64 {
        self.trim_in
    }

    /// Source out point (seconds into the media).
    pub fn source_out(&self, source_duration: f64) -> f64 {
        source_duration - self.trim_out
    }

    /// Effective clip length for a segment of `source_duration` seconds.
    pub fn effective_duration(&self, source_duration: f64, min_clip_length: f64) -> f64 {
        effective_duration(source_duration, *self, min_clip_length)
    }

    /// Bring both edges into range: non-negative, and together leaving at
    /// least `min_clip_length` of media. The tail gives way first.
    pub fn clamped(self, source_duration: f64, min_clip_length: f64) -> Self {
        let max_total = (source_duration - min_clip_length).max(0.0);
        let mut trim_in = non_negative(self.trim_in).min(max_total);
        let mut trim_out = non_negative(self.trim_out);
        if trim_in + trim_out > max_total {
            trim_out = (max_total - trim_in).max(0.0);
        }
        if trim_in + trim_out > max_total {
            trim_in = (max_total - trim_out).max(0.0);
        }
        Self { trim_in, trim_out }
    }

    /// Replace the head trim, clamped to `[0, D - min - trim_out]`.
    pub fn with_trim_in(self, value: f64, source_duration: f64, min_clip_length: f64) -> Self {
        let limit = (source_duration - min_clip_length - self.trim_out).max(0.0);
        Self {
            trim_in: non_negative(value).min(limit),
            ..self
        }
    }

    /// Replace the tail trim, clamped to `[0, D - min - trim_in]`.
    pub fn with_trim_out(self, value: f64, source_duration: f64, min_clip_length: f64) -> Self {
        let limit = (source_duration - min_clip_length - self.trim_in).max(0.0);
        Self {
            trim_out: non_negative(value).min(limit),
            ..self
        }
    }
}

/// `max(min_clip_length, source - trim_in - trim_out)`.
pub fn effective_duration(source_duration: f64, trim: TrimRange, min_clip_length: f64) -> f64 {
    let raw = source_duration - trim.trim_in - trim.trim_out;
    if raw.is_nan() || raw <= min_clip_length + LENGTH_EPSILON {
        min_clip_length
    } else {
        raw
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

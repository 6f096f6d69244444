//! Time representation for timeline interchange.
//!
//! The engine itself works in `f64` seconds. Frame-based values only appear at
//! the export boundary, where seconds are quantised into non-drop timecode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SeglineError};

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator.max(1) as f64
    }

    /// Integer frame count per timecode second (never zero).
    #[inline]
    pub fn nominal_fps(self) -> u32 {
        (self.to_fps_f64().round() as u32).max(1)
    }

    /// Common frame rates
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// Non-drop-frame SMPTE-style timecode (`HH:MM:SS:FF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl Timecode {
    /// Quantise a time in seconds.
    ///
    /// The frame field is `floor(fract(seconds) * fps)`; negative and
    /// non-finite inputs are treated as zero.
    pub fn from_seconds(seconds: f64, rate: FrameRate) -> Self {
        let seconds = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
        let fps = rate.nominal_fps();
        let whole = seconds.floor();
        let frames = (((seconds - whole) * fps as f64).floor() as u32).min(fps - 1);
        let whole = whole as u64;

        Self {
            hours: (whole / 3600) as u32,
            minutes: ((whole / 60) % 60) as u32,
            seconds: (whole % 60) as u32,
            frames,
        }
    }

    /// Total frame count from zero.
    pub fn total_frames(self, rate: FrameRate) -> u64 {
        let fps = rate.nominal_fps() as u64;
        let secs =
            self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64;
        secs * fps + self.frames as u64
    }

    /// Convert back to seconds.
    pub fn to_seconds(self, rate: FrameRate) -> f64 {
        self.total_frames(rate) as f64 / rate.nominal_fps() as f64
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

impl FromStr for Timecode {
    type Err = SeglineError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 4 {
            return Err(SeglineError::InvalidParameter(format!(
                "timecode must be HH:MM:SS:FF, got {s:?}"
            )));
        }

        let mut fields = [0u32; 4];
        for (field, part) in fields.iter_mut().zip(&parts) {
            *field = part.parse().map_err(|_| {
                SeglineError::InvalidParameter(format!("invalid timecode field {part:?} in {s:?}"))
            })?;
        }

        let [hours, minutes, seconds, frames] = fields;
        if minutes >= 60 || seconds >= 60 {
            return Err(SeglineError::InvalidParameter(format!(
                "timecode out of range: {s:?}"
            )));
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
            frames,
        })
    }
}

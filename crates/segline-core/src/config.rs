//! Engine configuration.
//!
//! Stored as JSON. Every field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, SeglineError};
use crate::time::FrameRate;
use crate::MIN_CLIP_LENGTH;

/// File name inside the per-user config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Tunables shared by the timeline, playback, and export layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shortest effective clip length a trim may produce (seconds).
    pub min_clip_length_sec: f64,
    /// Frame rate used for EDL timecodes.
    pub export_fps: u32,
    /// Multiplier applied by a single zoom step.
    pub zoom_factor: f32,
    pub min_pixels_per_second: f32,
    pub max_pixels_per_second: f32,
    pub default_pixels_per_second: f32,
    /// Horizontal margin reserved by fit-to-width.
    pub fit_margin_px: f32,
    /// Minimum spacing between ruler labels.
    pub min_label_gap_px: f32,
    /// Distance from the viewport edge at which the playhead triggers a page scroll.
    pub autoscroll_margin_px: f32,
    /// Width of the grab zone on each clip edge.
    pub trim_handle_px: f32,
    /// Start playback as soon as a clip is selected.
    pub autoplay: bool,
    /// Audio drift tolerated before the background track is re-seeked.
    pub audio_drift_tolerance_sec: f64,
    pub undo_depth: usize,
    /// Prompt column length in the CSV manifest.
    pub prompt_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_clip_length_sec: MIN_CLIP_LENGTH,
            export_fps: 30,
            zoom_factor: 1.3,
            min_pixels_per_second: 2.0,
            max_pixels_per_second: 300.0,
            default_pixels_per_second: 40.0,
            fit_margin_px: 40.0,
            min_label_gap_px: 60.0,
            autoscroll_margin_px: 80.0,
            trim_handle_px: 6.0,
            autoplay: true,
            audio_drift_tolerance_sec: 0.25,
            undo_depth: 100,
            prompt_max_chars: 200,
        }
    }
}

impl EngineConfig {
    /// Per-user config location (`<config dir>/segline/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("segline").join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, falling back to the per-user location, then defaults.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let data = std::fs::read(&path)?;
        let config = Self::from_json(&data)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and sanitize a JSON document.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| SeglineError::Config(format!("Invalid config: {}", e)))?;
        Ok(config.sanitized())
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)
            .map_err(|e| SeglineError::Serialization(format!("Failed to write config: {}", e)))?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Clamp every field into a usable range.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.min_clip_length_sec.is_finite() || self.min_clip_length_sec <= 0.0 {
            self.min_clip_length_sec = defaults.min_clip_length_sec;
        }
        self.export_fps = self.export_fps.clamp(1, 120);
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 1.0) {
            self.zoom_factor = defaults.zoom_factor;
        }
        if !(self.min_pixels_per_second > 0.0) {
            self.min_pixels_per_second = defaults.min_pixels_per_second;
        }
        if !(self.max_pixels_per_second >= self.min_pixels_per_second) {
            self.max_pixels_per_second = self
                .min_pixels_per_second
                .max(defaults.max_pixels_per_second);
        }
        self.default_pixels_per_second = self
            .default_pixels_per_second
            .clamp(self.min_pixels_per_second, self.max_pixels_per_second);
        self.fit_margin_px = self.fit_margin_px.max(0.0);
        self.min_label_gap_px = self.min_label_gap_px.max(1.0);
        self.autoscroll_margin_px = self.autoscroll_margin_px.max(0.0);
        self.trim_handle_px = self.trim_handle_px.max(1.0);
        if !(self.audio_drift_tolerance_sec >= 0.0) {
            self.audio_drift_tolerance_sec = defaults.audio_drift_tolerance_sec;
        }
        self.undo_depth = self.undo_depth.max(1);
        self
    }

    /// Frame rate used for EDL timecodes.
    pub fn export_frame_rate(&self) -> FrameRate {
        FrameRate::new(self.export_fps, 1)
    }
}

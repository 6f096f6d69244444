//! Interchange exports for editorial hand-off.
//!
//! Both exports are pure functions of the timeline state. An empty timeline
//! yields a header-only document rather than an error.

mod csv;
mod edl;
mod naming;

pub use csv::{build_csv, export_order, CSV_HEADER};
pub use edl::{build_edl, edl_events, EdlEvent};
pub use naming::{segment_filename, title_abbreviation};

use segline_core::{EngineConfig, FrameRate, MIN_CLIP_LENGTH};
use segline_timeline::TimelineDocument;
use serde::{Deserialize, Serialize};

/// Supported export document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Edl,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Edl => "edl",
            Self::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Edl => "Edit Decision List",
            Self::Csv => "Segment manifest",
        }
    }
}

/// Episode-level values shared by every export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub title: String,
    pub episode_number: u32,
    pub episode_label: String,
    /// Timecode base for EDL events.
    pub frame_rate: FrameRate,
    pub min_clip_length: f64,
    /// Prompt column is cut to this many characters.
    pub prompt_max_chars: usize,
}

impl Default for ExportMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            episode_number: 1,
            episode_label: String::new(),
            frame_rate: FrameRate::FPS_30,
            min_clip_length: MIN_CLIP_LENGTH,
            prompt_max_chars: 200,
        }
    }
}

impl ExportMeta {
    pub fn from_document(document: &TimelineDocument, config: &EngineConfig) -> Self {
        Self {
            title: document.title.clone(),
            episode_number: document.episode_number,
            episode_label: document.episode_label.clone(),
            frame_rate: config.export_frame_rate(),
            min_clip_length: config.min_clip_length_sec,
            prompt_max_chars: config.prompt_max_chars,
        }
    }

    pub fn abbreviation(&self) -> String {
        title_abbreviation(&self.title)
    }

    /// Suggested file name for a whole-episode export, e.g. `NM-S02.edl`.
    pub fn export_file_name(&self, format: ExportFormat) -> String {
        format!(
            "{}-S{:02}.{}",
            self.abbreviation(),
            self.episode_number,
            format.extension()
        )
    }
}

//! Segment records, the engine's read-only input.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, stable segment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub Uuid);

impl SegmentId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SegmentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Generation status reported by the segment store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    #[default]
    Pending,
    Generating,
    Done,
    Failed,
    /// Any status string this engine does not know about.
    #[serde(other)]
    Unknown,
}

impl SegmentStatus {
    /// Lowercase name as written to exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Generating => "generating",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SegmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shot metadata carried through to the CSV manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotMetadata {
    #[serde(default)]
    pub shot_type: Option<String>,
    #[serde(default)]
    pub camera: Option<String>,
}

/// A single independently-generated video clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    /// Full untrimmed clip length in seconds.
    pub source_duration: f64,
    #[serde(default)]
    pub status: SegmentStatus,
    /// Scene this segment belongs to (1-based by convention).
    pub scene_number: u32,
    /// Position of the segment inside its scene (0-based).
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub shot: ShotMetadata,
}

impl Segment {
    /// Create a pending segment with no media attached.
    pub fn new(scene_number: u32, index: u32, source_duration: f64) -> Self {
        Self {
            id: SegmentId::new(),
            source_duration,
            status: SegmentStatus::Pending,
            scene_number,
            index,
            media_url: None,
            thumbnail_url: None,
            prompt: String::new(),
            shot: ShotMetadata::default(),
        }
    }

    /// Create a finished segment with a media URL.
    pub fn done(
        scene_number: u32,
        index: u32,
        source_duration: f64,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            status: SegmentStatus::Done,
            media_url: Some(media_url.into()),
            ..Self::new(scene_number, index, source_duration)
        }
    }

    /// Whether this segment can take part in playback and EDL export.
    pub fn is_playable(&self) -> bool {
        self.status == SegmentStatus::Done
            && self.source_duration.is_finite()
            && self.source_duration > 0.0
            && self.media_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// The media URL, empty when none is attached.
    pub fn media_url_or_empty(&self) -> &str {
        self.media_url.as_deref().unwrap_or("")
    }
}

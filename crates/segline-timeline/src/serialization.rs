//! Timeline manifest serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.

use std::collections::HashSet;

use segline_core::{Result, Segment, SegmentId, SeglineError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::TimelineModel;
use crate::order::natural_order;
use crate::trim::TrimMap;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Caller-side state for one episode's timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineDocument {
    /// Series/project title, used for export naming.
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_episode_number")]
    pub episode_number: u32,
    /// Human-readable episode label (e.g. "Episode 3: The Return").
    #[serde(default)]
    pub episode_label: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub order: Vec<SegmentId>,
    #[serde(default)]
    pub trim: TrimMap,
    /// Optional background audio track.
    #[serde(default)]
    pub audio_track_url: Option<String>,
}

fn default_episode_number() -> u32 {
    1
}

impl TimelineDocument {
    /// Build an in-memory model from this document.
    pub fn model(&self) -> TimelineModel {
        TimelineModel::new(self.segments.clone(), &self.order, self.trim.clone())
    }

    /// Build a model honouring a configured minimum clip length.
    pub fn model_with_min_clip_length(&self, min_clip_length: f64) -> TimelineModel {
        TimelineModel::with_min_clip_length(
            self.segments.clone(),
            &self.order,
            self.trim.clone(),
            min_clip_length,
        )
    }

    /// Drop order and trim entries that name no segment in this document, and
    /// repeated order entries.
    ///
    /// Returns how many entries were removed.
    pub fn prune_dangling(&mut self) -> usize {
        let known: HashSet<SegmentId> = self.segments.iter().map(|s| s.id).collect();
        let before = self.order.len() + self.trim.len();

        let mut seen = HashSet::with_capacity(self.order.len());
        self.order.retain(|id| known.contains(id) && seen.insert(*id));
        self.trim.retain(|id, _| known.contains(id));

        before - (self.order.len() + self.trim.len())
    }

    /// Copy order and trims back from an edited model.
    pub fn update_from(&mut self, model: &TimelineModel) {
        self.order = model.order().to_vec();
        self.trim = model.trim_map().clone();
    }
}

/// Versioned manifest file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineFile {
    /// Schema version for migration.
    pub version: u32,
    /// Application version that wrote this file.
    pub app_version: String,
    pub timeline: TimelineDocument,
}

impl TimelineFile {
    /// Wrap a document at the current version.
    pub fn new(timeline: TimelineDocument) -> Self {
        Self {
            version: CURRENT_VERSION,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            timeline,
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            SeglineError::Serialization(format!("Failed to serialize timeline: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| SeglineError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(SeglineError::Serialization(format!(
                "Timeline file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        let mut file: Self = serde_json::from_value(migrated)
            .map_err(|e| SeglineError::Serialization(format!("Failed to parse timeline: {}", e)))?;
        let pruned = file.timeline.prune_dangling();
        if pruned > 0 {
            warn!("Dropped {} manifest entries that reference no segment", pruned);
        }
        if file.timeline.order.is_empty() {
            file.timeline.order = natural_order(&file.timeline.segments);
        }
        Ok(file)
    }

    /// Save to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: a bare segment array becomes a wrapped document
                if data.is_array() {
                    data = serde_json::json!({
                        "version": 1,
                        "app_version": "0.1.0",
                        "timeline": { "segments": data },
                    });
                } else if data.get("timeline").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "app_version": "0.1.0",
                        "timeline": data,
                    });
                }
                version = 1;
            }
            _ => {
                return Err(SeglineError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trim::TrimRange;

    fn document() -> TimelineDocument {
        let segments = vec![
            Segment::done(1, 0, 5.0, "https://cdn.example/a.mp4"),
            Segment::done(2, 0, 4.0, "https://cdn.example/b.mp4"),
        ];
        let order = vec![segments[1].id, segments[0].id];
        let mut trim = TrimMap::new();
        trim.insert(segments[0].id, TrimRange::new(1.0, 0.5));
        TimelineDocument {
            title: "Night Market".into(),
            episode_number: 2,
            episode_label: "Episode 2".into(),
            segments,
            order,
            trim,
            audio_track_url: None,
        }
    }

    #[test]
    fn test_timeline_file_roundtrip() {
        let file = TimelineFile::new(document());
        let json = file.to_json().unwrap();
        let loaded = TimelineFile::from_json(&json).unwrap();

        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.timeline.title, "Night Market");
        assert_eq!(loaded.timeline.order, file.timeline.order);
        let first = file.timeline.segments[0].id;
        assert_eq!(loaded.timeline.trim[&first], TrimRange::new(1.0, 0.5));
    }

    #[test]
    fn test_migration_v0_segment_array() {
        let doc = document();
        let raw_json = serde_json::to_vec(&doc.segments).unwrap();

        let loaded = TimelineFile::from_json(&raw_json).unwrap();
        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.timeline.segments.len(), 2);
        // Missing order falls back to natural order.
        assert_eq!(loaded.timeline.order[0], doc.segments[0].id);
        assert_eq!(loaded.timeline.episode_number, 1);
    }

    #[test]
    fn test_migration_v0_bare_document() {
        let raw_json = serde_json::to_vec(&document()).unwrap();
        let loaded = TimelineFile::from_json(&raw_json).unwrap();
        assert_eq!(loaded.timeline.episode_number, 2);
    }

    #[test]
    fn test_load_prunes_dangling_entries() {
        let mut doc = document();
        let kept = doc.order.clone();
        let stray = SegmentId::new();
        doc.order.insert(1, stray);
        doc.order.push(kept[0]);
        doc.trim.insert(stray, TrimRange::new(1.0, 0.0));
        let json = TimelineFile::new(doc).to_json().unwrap();

        let loaded = TimelineFile::from_json(&json).unwrap().timeline;
        assert_eq!(loaded.order, kept);
        assert_eq!(loaded.trim.len(), 1);
        assert!(!loaded.trim.contains_key(&stray));
    }

    #[test]
    fn test_order_naming_only_unknown_segments_falls_back() {
        let mut doc = document();
        doc.order = vec![SegmentId::new()];
        let json = TimelineFile::new(doc.clone()).to_json().unwrap();
        let loaded = TimelineFile::from_json(&json).unwrap().timeline;
        assert_eq!(loaded.order, natural_order(&doc.segments));
    }

    #[test]
    fn test_future_version_rejected() {
        let json = serde_json::json!({
            "version": 999,
            "app_version": "99.0.0",
            "timeline": {},
        });
        let data = serde_json::to_vec(&json).unwrap();
        assert!(TimelineFile::from_json(&data).is_err());
    }

    #[test]
    fn test_update_from_model() {
        let mut doc = document();
        let mut model = doc.model();
        let first = model.order()[0];
        model.reorder(first, 2);
        doc.update_from(&model);
        assert_eq!(doc.order[1], first);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.json");
        TimelineFile::new(document()).save_to_file(&path).unwrap();
        let loaded = TimelineFile::load_from_file(&path).unwrap();
        assert_eq!(loaded.timeline.segments.len(), 2);
    }
}

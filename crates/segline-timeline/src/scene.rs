//! Scene markers derived from clip order.

use crate::clip::Clip;

/// Start of a maximal run of consecutive clips sharing a scene number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMarker {
    pub scene_number: u32,
    /// Cumulative start of the run's first clip.
    pub time: f64,
    /// Position of the run's first clip.
    pub clip_index: usize,
    /// Number of clips in the run.
    pub clip_count: usize,
    /// Total timeline length of the run.
    pub duration: f64,
}

impl SceneMarker {
    pub fn end(&self) -> f64 {
        self.time + self.duration
    }
}

/// One marker per run. A scene split by reordering produces one marker per piece.
pub fn scene_markers(clips: &[Clip]) -> Vec<SceneMarker> {
    let mut markers: Vec<SceneMarker> = Vec::new();
    for clip in clips {
        match markers.last_mut() {
            Some(run) if run.scene_number == clip.segment.scene_number => {
                run.clip_count += 1;
                run.duration += clip.effective_duration;
            }
            _ => markers.push(SceneMarker {
                scene_number: clip.segment.scene_number,
                time: clip.cumulative_start,
                clip_index: clip.position,
                clip_count: 1,
                duration: clip.effective_duration,
            }),
        }
    }
    markers
}

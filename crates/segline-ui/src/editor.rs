//! Timeline editor state: turns pointer and keyboard input into order and
//! trim edits plus viewport bookkeeping.
//!
//! The editor never mutates the timeline itself. It emits `EditorAction`s
//! that the host applies to its model and persists.

use segline_core::{EngineConfig, SegmentId, MIN_CLIP_LENGTH};
use segline_timeline::{drop_gap, Clip, TrimRange};
use tracing::debug;

use crate::commands::{CommandRegistry, EditorCommand};
use crate::gesture::{drop_position_at_x, Gesture, ReorderDrag, TrimDrag, TrimEdge};
use crate::playhead::follow_scroll;
use crate::scale::TimelineScale;

/// Something the host should do in response to editor input.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Seek playback to a timeline time.
    Seek(f64),
    SelectClip(SegmentId),
    /// Move `segment_id` into gap `gap` of the current order.
    Reorder { segment_id: SegmentId, gap: usize },
    /// Live trim while an edge is being dragged. Not an undo step.
    TrimPreview { segment_id: SegmentId, trim: TrimRange },
    /// Trim committed on release.
    TrimCommit {
        segment_id: SegmentId,
        before: TrimRange,
        after: TrimRange,
    },
    /// Keyboard command the editor does not handle itself.
    Command(EditorCommand),
}

pub struct TimelineEditor {
    scale: TimelineScale,
    gesture: Gesture,
    selected: Option<SegmentId>,
    viewport_width: f32,
    min_clip_length: f64,
    min_label_gap_px: f32,
    autoscroll_margin_px: f32,
    trim_handle_px: f32,
    commands: CommandRegistry,
}

impl Default for TimelineEditor {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl TimelineEditor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scale: TimelineScale::from_config(config),
            gesture: Gesture::Idle,
            selected: None,
            viewport_width: 0.0,
            min_clip_length: if config.min_clip_length_sec > 0.0 {
                config.min_clip_length_sec
            } else {
                MIN_CLIP_LENGTH
            },
            min_label_gap_px: config.min_label_gap_px,
            autoscroll_margin_px: config.autoscroll_margin_px,
            trim_handle_px: config.trim_handle_px,
            commands: CommandRegistry::new(),
        }
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn scale(&self) -> &TimelineScale {
        &self.scale
    }

    /// Replace the viewport scale, e.g. with one restored from storage.
    pub fn set_scale(&mut self, scale: TimelineScale) {
        self.scale = scale;
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn selected(&self) -> Option<SegmentId> {
        self.selected
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(0.0);
    }

    pub fn min_label_gap_px(&self) -> f32 {
        self.min_label_gap_px
    }

    pub fn trim_handle_px(&self) -> f32 {
        self.trim_handle_px
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    // ── Keyboard ───────────────────────────────────────────────

    /// Handle a command. Zoom and fit are applied here; the rest go to the host.
    pub fn apply_command(&mut self, command: EditorCommand, total: f64) -> Option<EditorAction> {
        match command {
            EditorCommand::ZoomIn => self.scale.zoom_in(),
            EditorCommand::ZoomOut => self.scale.zoom_out(),
            EditorCommand::ToggleFit => self.scale.toggle_fit(self.viewport_width, total),
            other => return Some(EditorAction::Command(other)),
        }
        self.scale.clamp_scroll(self.viewport_width, total);
        None
    }

    /// Poll this frame's shortcuts and handle them.
    pub fn handle_shortcuts(&mut self, ctx: &egui::Context, total: f64) -> Vec<EditorAction> {
        let commands = self.commands.poll(ctx);
        commands
            .into_iter()
            .filter_map(|command| self.apply_command(command, total))
            .collect()
    }

    // ── Viewport ───────────────────────────────────────────────

    /// Zoom around a pointer position (modifier + wheel).
    pub fn wheel_zoom(&mut self, anchor_x: f32, steps: f32, total: f64) {
        self.scale.zoom_at(anchor_x, steps);
        self.scale.clamp_scroll(self.viewport_width, total);
    }

    pub fn scroll_by(&mut self, delta_px: f32, total: f64) {
        self.scale.scroll_by(delta_px);
        self.scale.clamp_scroll(self.viewport_width, total);
    }

    /// Keep the playhead in view during playback. Paused playheads and
    /// running gestures leave the viewport alone.
    pub fn follow_playhead(&mut self, playhead: f64, playing: bool) {
        if !playing || !self.gesture.is_idle() {
            return;
        }
        if let Some(scroll) = follow_scroll(
            &self.scale,
            playhead,
            self.viewport_width,
            self.autoscroll_margin_px,
        ) {
            self.scale.set_scroll(scroll);
        }
    }

    // ── Pointer ────────────────────────────────────────────────

    /// Click on the ruler: seek to the time under the pointer.
    pub fn click_ruler(&mut self, x: f32) -> EditorAction {
        EditorAction::Seek(self.scale.x_to_time(x))
    }

    /// Click on a clip body: select it and seek to its start.
    pub fn click_clip(&mut self, clip: &Clip) -> Vec<EditorAction> {
        self.selected = Some(clip.id());
        vec![
            EditorAction::SelectClip(clip.id()),
            EditorAction::Seek(clip.cumulative_start),
        ]
    }

    /// Grab a clip edge. Ignored while another gesture runs.
    pub fn begin_trim(&mut self, clip: &Clip, edge: TrimEdge, x: f32) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        debug!("Trim drag started on {} ({:?})", clip.id(), edge);
        self.selected = Some(clip.id());
        self.gesture = Gesture::Trim(TrimDrag::new(clip, edge, x, self.min_clip_length));
        true
    }

    /// Grab a clip body for reordering. Ignored while another gesture runs.
    pub fn begin_reorder(&mut self, clip: &Clip, index: usize) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        debug!("Reorder drag started on {}", clip.id());
        self.selected = Some(clip.id());
        self.gesture = Gesture::Reorder(ReorderDrag::new(clip.id(), index));
        true
    }

    /// Press on the ruler and drag to scrub.
    pub fn begin_scrub(&mut self) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        self.gesture = Gesture::Scrub;
        true
    }

    /// Pointer moved during a gesture.
    pub fn drag_to(&mut self, clips: &[Clip], x: f32) -> Option<EditorAction> {
        let drop_zones_enabled = self.gesture.drop_zones_enabled();
        match &mut self.gesture {
            Gesture::Idle => None,
            Gesture::Scrub => Some(EditorAction::Seek(self.scale.x_to_time(x))),
            Gesture::Trim(drag) => {
                let before = drag.current();
                let trim = drag.update(x, self.scale.pixels_per_second());
                (trim != before).then_some(EditorAction::TrimPreview {
                    segment_id: drag.segment_id,
                    trim,
                })
            }
            Gesture::Reorder(drag) => {
                if drop_zones_enabled {
                    let position = drop_position_at_x(clips, &self.scale, x);
                    let order: Vec<SegmentId> = clips.iter().map(Clip::id).collect();
                    drag.hover_gap = drop_gap(&order, position);
                }
                None
            }
        }
    }

    /// Pointer released or capture lost: commit the last value.
    pub fn release(&mut self) -> Option<EditorAction> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Scrub => None,
            Gesture::Trim(drag) => {
                if !drag.has_changed() {
                    return None;
                }
                debug!("Trim committed on {}", drag.segment_id);
                Some(EditorAction::TrimCommit {
                    segment_id: drag.segment_id,
                    before: drag.original(),
                    after: drag.current(),
                })
            }
            Gesture::Reorder(drag) => {
                let gap = drag.hover_gap.filter(|_| drag.is_move())?;
                debug!("Reorder dropped {} at gap {}", drag.segment_id, gap);
                Some(EditorAction::Reorder {
                    segment_id: drag.segment_id,
                    gap,
                })
            }
        }
    }

    /// Drop selection of segments that left the timeline.
    pub fn retain_selection(&mut self, clips: &[Clip]) {
        if let Some(id) = self.selected {
            if !clips.iter().any(|c| c.id() == id) {
                self.selected = None;
            }
        }
    }
}

//! Segline Timeline - Timeline data model
//!
//! Implements the single-track segment timeline:
//! - Clip Model: effective durations, cumulative offsets, time lookup
//! - Trim ranges with minimum-length clamping
//! - Timeline order reconciliation and drag reordering
//! - Scene markers
//! - Edit commands with undo/redo
//! - Versioned manifest files

pub mod clip;
pub mod edit;
pub mod model;
pub mod order;
pub mod scene;
pub mod serialization;
pub mod trim;

pub use clip::{
    clip_at_time, clip_index_at_time, compute_clips, compute_clips_with, locate, total_duration,
    Clip,
};
pub use edit::{EditCommand, UndoStack};
pub use model::TimelineModel;
pub use order::{
    drop_gap, is_noop_drop, move_to_gap, natural_order, reconcile_order, DropPosition,
};
pub use scene::{scene_markers, SceneMarker};
pub use serialization::{TimelineDocument, TimelineFile};
pub use trim::{effective_duration, TrimMap, TrimRange};

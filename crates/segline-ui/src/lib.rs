//! Segline UI - timeline editor
//!
//! - `scale`: time/pixel mapping, zoom, fit toggle
//! - `ruler`: tick interval ladder and labels
//! - `gesture`: modal trim and reorder drags
//! - `playhead`: playhead time and viewport follow
//! - `commands`: keyboard shortcut registry
//! - `editor`: editor state turning input into `EditorAction`s
//! - `timeline`: the egui widget

pub mod commands;
pub mod editor;
pub mod gesture;
pub mod playhead;
pub mod ruler;
pub mod scale;
pub mod theme;
pub mod timeline;

pub use commands::{CommandRegistry, EditorCommand, Modifiers, Shortcut};
pub use editor::{EditorAction, TimelineEditor};
pub use gesture::{drop_position_at_x, hit_test_trim_handle, Gesture, ReorderDrag, TrimDrag, TrimEdge};
pub use playhead::{follow_scroll, playhead_time};
pub use ruler::{tick_interval, visible_ticks, RulerTick, TICK_LADDER};
pub use scale::TimelineScale;
pub use theme::Theme;
pub use timeline::{show_timeline, TimelineView};

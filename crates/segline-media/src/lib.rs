//! Segline Media - playback and interchange
//!
//! - `buffer`: the `MediaBuffer` seam the host implements (video element, decoder, ...)
//! - `playback`: dual-buffer controller giving gapless clip-to-clip playback
//! - `export`: EDL and CSV manifests plus the shared file naming convention

pub mod buffer;
pub mod export;
pub mod playback;

pub use buffer::{BufferEvent, BufferId, MediaBuffer};
pub use export::{
    build_csv, build_edl, edl_events, export_order, segment_filename, title_abbreviation, CSV_HEADER,
    EdlEvent, ExportFormat, ExportMeta,
};
pub use playback::{
    PlaybackController, PlaybackCursor, PlaybackEvent, PlaybackItem, PlaybackState, SeekKind,
};

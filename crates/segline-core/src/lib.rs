//! Segline Core - Foundation types for the segmented-video timeline engine
//!
//! This crate provides the fundamental types used throughout Segline:
//! - Segment records as delivered by the caller's store
//! - Time representation (FrameRate, Timecode)
//! - Engine configuration
//! - The shared error type

pub mod config;
pub mod error;
pub mod segment;
pub mod time;

pub use config::EngineConfig;
pub use error::{Result, SeglineError};
pub use segment::{Segment, SegmentId, SegmentStatus, ShotMetadata};
pub use time::{FrameRate, Timecode};

/// A clip can never be trimmed below this length (seconds).
pub const MIN_CLIP_LENGTH: f64 = 0.5;

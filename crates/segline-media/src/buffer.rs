//! Media buffer abstraction.
//!
//! A buffer is one loadable, playable media resource (a `<video>` element, a
//! decoder pipeline, ...). The playback controller owns two of them and never
//! inspects their internal state; everything it knows comes from the calls it
//! made and the `BufferEvent`s the host forwards.

use segline_core::Result;
use std::fmt;

/// Which of the two interchangeable buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferId {
    A,
    B,
}

impl BufferId {
    /// The other buffer.
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Media-level notifications forwarded from a buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferEvent {
    /// Enough data is buffered to start playback.
    CanPlay,
    /// Current media time, in seconds from the start of the source.
    TimeUpdate(f64),
    /// Playback reached the end of the source.
    Ended,
    /// Loading or decoding failed.
    Error(String),
}

/// One playable media resource.
pub trait MediaBuffer {
    /// Start loading `url` without starting playback.
    fn load(&mut self, url: &str);

    /// Start or resume playback. Autoplay refusals and decode failures are
    /// reported as `Err` and treated as non-fatal by the controller.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Move the transport to `seconds` into the source.
    fn seek(&mut self, seconds: f64);

    /// Volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);

    fn set_muted(&mut self, muted: bool);

    /// Show or hide the buffer. A hidden buffer must not take pointer input.
    fn set_presented(&mut self, presented: bool, controls_visible: bool);
}

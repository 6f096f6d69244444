//! Segline Audio - background audio track
//!
//! One audio element plays under the whole sequence. `AudioTrackSync` keeps
//! its transport aligned with the cumulative video position and follows the
//! sequence's play/pause in lockstep. It never reads clip order or trims; the
//! caller hands it timeline times computed by the clip model.

use segline_core::{EngineConfig, Result};
use tracing::{debug, info, warn};

/// A host audio element.
pub trait AudioElement {
    fn load(&mut self, url: &str);

    /// Start playback. Autoplay refusals come back as `Err`.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn seek(&mut self, seconds: f64);

    /// Current transport position in seconds.
    fn position(&self) -> f64;

    /// Media length once known.
    fn duration(&self) -> Option<f64> {
        None
    }
}

/// Keeps one audio element aligned with the video sequence.
pub struct AudioTrackSync<A: AudioElement> {
    element: Option<A>,
    url: Option<String>,
    playing: bool,
    /// Past the end of the audio media; stays silent until a seek comes back.
    exhausted: bool,
    drift_tolerance: f64,
}

impl<A: AudioElement> AudioTrackSync<A> {
    /// Create a detached synchroniser.
    pub fn new(drift_tolerance: f64) -> Self {
        Self {
            element: None,
            url: None,
            playing: false,
            exhausted: false,
            drift_tolerance: drift_tolerance.max(0.0),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.audio_drift_tolerance_sec)
    }

    /// Load `url` into `element` and start tracking it. Replaces any previous
    /// element, which is paused and returned.
    pub fn attach(&mut self, mut element: A, url: &str) -> Option<A> {
        let previous = self.detach();
        element.load(url);
        info!("Attached audio track {}", url);
        self.element = Some(element);
        self.url = Some(url.to_string());
        self.exhausted = false;
        previous
    }

    /// Stop tracking and hand the element back.
    pub fn detach(&mut self) -> Option<A> {
        let mut element = self.element.take()?;
        element.pause();
        self.url = None;
        self.playing = false;
        debug!("Detached audio track");
        Some(element)
    }

    pub fn is_attached(&self) -> bool {
        self.element.is_some()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn element(&self) -> Option<&A> {
        self.element.as_ref()
    }

    pub fn drift_tolerance(&self) -> f64 {
        self.drift_tolerance
    }

    /// Move the audio transport to a cumulative video time.
    pub fn seek_to(&mut self, video_time: f64) {
        let Some(element) = self.element.as_mut() else {
            return;
        };
        let target = if video_time.is_finite() {
            video_time.max(0.0)
        } else {
            0.0
        };

        match element.duration() {
            Some(length) if target >= length => {
                if !self.exhausted {
                    debug!("Video time {:.3}s is past the audio track end", target);
                }
                element.pause();
                self.exhausted = true;
            }
            _ => {
                element.seek(target);
                if self.exhausted {
                    self.exhausted = false;
                    if self.playing {
                        start(element);
                    }
                }
            }
        }
    }

    /// Start in lockstep with the video sequence.
    pub fn play(&mut self) {
        self.playing = true;
        if self.exhausted {
            return;
        }
        if let Some(element) = self.element.as_mut() {
            start(element);
        }
    }

    /// Pause in lockstep with the video sequence.
    pub fn pause(&mut self) {
        self.playing = false;
        if let Some(element) = self.element.as_mut() {
            element.pause();
        }
    }

    /// Re-seek only if the audio has drifted further than the tolerance from
    /// `video_time`. Returns whether a seek was issued.
    pub fn reconcile(&mut self, video_time: f64) -> bool {
        let Some(element) = self.element.as_ref() else {
            return false;
        };
        if self.exhausted {
            return false;
        }
        let drift = (element.position() - video_time).abs();
        if drift <= self.drift_tolerance {
            return false;
        }
        debug!("Audio drifted {:.3}s, re-seeking to {:.3}s", drift, video_time);
        self.seek_to(video_time);
        true
    }
}

fn start<A: AudioElement>(element: &mut A) {
    if let Err(e) = element.play() {
        warn!("Audio track refused to play: {}", e);
    }
}

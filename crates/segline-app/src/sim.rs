//! Clock-driven stand-ins for the host media elements.
//!
//! The preview has no decoder: a `SimBuffer` just advances a transport
//! position while playing and reports it over a channel, the way a real
//! element fires `timeupdate`/`ended`. The app drains the channel once per
//! frame and feeds the events to the playback controller.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crossbeam_channel::Sender;
use segline_audio::AudioElement;
use segline_core::{Result, SeglineError};
use segline_media::{BufferEvent, BufferId, MediaBuffer};

/// Source lengths by media URL.
pub type MediaLibrary = Rc<HashMap<String, f64>>;

pub type BufferMessage = (BufferId, BufferEvent);

pub struct SimBuffer {
    id: BufferId,
    events: Sender<BufferMessage>,
    library: MediaLibrary,
    url: Option<String>,
    position: Cell<f64>,
    ended: Cell<bool>,
    playing: bool,
    presented: bool,
    volume: f32,
    muted: bool,
}

impl SimBuffer {
    pub fn new(id: BufferId, events: Sender<BufferMessage>, library: MediaLibrary) -> Self {
        Self {
            id,
            events,
            library,
            url: None,
            position: Cell::new(0.0),
            ended: Cell::new(false),
            playing: false,
            presented: false,
            volume: 1.0,
            muted: false,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn position(&self) -> f64 {
        self.position.get()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// Audible output level after mute.
    pub fn output_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Advance the transport by `dt` seconds of wall time.
    pub fn tick(&self, dt: f64) {
        if !self.playing || self.ended.get() {
            return;
        }
        let Some(duration) = self.url.as_ref().and_then(|u| self.library.get(u)).copied() else {
            return;
        };
        let position = (self.position.get() + dt).min(duration);
        self.position.set(position);
        self.send(BufferEvent::TimeUpdate(position));
        if position >= duration {
            self.ended.set(true);
            self.send(BufferEvent::Ended);
        }
    }

    fn send(&self, event: BufferEvent) {
        // The receiver lives as long as the app; a closed channel means shutdown.
        let _ = self.events.send((self.id, event));
    }
}

impl MediaBuffer for SimBuffer {
    fn load(&mut self, url: &str) {
        self.url = Some(url.to_string());
        self.playing = false;
        self.position.set(0.0);
        self.ended.set(false);
        if self.library.contains_key(url) {
            self.send(BufferEvent::CanPlay);
        } else {
            self.send(BufferEvent::Error(format!("no media at {url}")));
        }
    }

    fn play(&mut self) -> Result<()> {
        match self.url.as_deref() {
            Some(url) if self.library.contains_key(url) => {
                self.playing = true;
                Ok(())
            }
            Some(url) => Err(SeglineError::Media(format!("cannot play {url}"))),
            None => Err(SeglineError::Media("nothing loaded".into())),
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.position.set(seconds.max(0.0));
        self.ended.set(false);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_presented(&mut self, presented: bool, _controls_visible: bool) {
        self.presented = presented;
    }
}

/// Background audio element with a known length.
pub struct SimAudio {
    url: Option<String>,
    duration: Option<f64>,
    position: Cell<f64>,
    playing: bool,
}

impl SimAudio {
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            url: None,
            duration,
            position: Cell::new(0.0),
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn tick(&self, dt: f64) {
        if !self.playing {
            return;
        }
        let mut position = self.position.get() + dt;
        if let Some(duration) = self.duration {
            position = position.min(duration);
        }
        self.position.set(position);
    }
}

impl AudioElement for SimAudio {
    fn load(&mut self, url: &str) {
        self.url = Some(url.to_string());
        self.position.set(0.0);
    }

    fn play(&mut self) -> Result<()> {
        if self.url.is_none() {
            return Err(SeglineError::Audio("no track loaded".into()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.position.set(seconds);
    }

    fn position(&self) -> f64 {
        self.position.get()
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }
}

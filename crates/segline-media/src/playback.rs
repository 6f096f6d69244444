//! Gapless playback over a sequence of independently loaded clips.
//!
//! Two buffers take turns: the active one plays the current clip while the
//! inactive one holds the next clip, loaded and parked at its in point. When
//! the current clip ends the controller relabels the inactive buffer as active
//! and starts it, so the next first frame is already decoded.
//!
//! `active` is the only selector of which buffer is audible, visible, and
//! controllable. The controller never queries buffer state to decide this.

use segline_core::SegmentId;
use segline_timeline::Clip;
use tracing::{debug, info, warn};

use crate::buffer::{BufferEvent, BufferId, MediaBuffer};

/// Time updates this close to the out point count as end-of-clip.
const OUT_POINT_EPSILON: f64 = 1e-3;

/// One entry of the playback sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackItem {
    pub segment_id: SegmentId,
    pub url: String,
    /// Source time at which the clip starts.
    pub trim_in: f64,
    /// Source time at which the clip ends.
    pub out_point: f64,
    /// Timeline time of the clip's first frame.
    pub cumulative_start: f64,
    /// Timeline length of the clip.
    pub duration: f64,
}

impl PlaybackItem {
    /// Build from a computed clip. Clips without a media URL yield `None`.
    pub fn from_clip(clip: &Clip) -> Option<Self> {
        let url = clip.segment.media_url.clone().filter(|u| !u.is_empty())?;
        Some(Self {
            segment_id: clip.id(),
            url,
            trim_in: clip.source_in(),
            out_point: clip.source_out(),
            cumulative_start: clip.cumulative_start,
            duration: clip.effective_duration,
        })
    }

    pub fn from_clips(clips: &[Clip]) -> Vec<Self> {
        clips.iter().filter_map(Self::from_clip).collect()
    }

    fn end(&self) -> f64 {
        self.cumulative_start + self.duration
    }
}

/// Transport state of the whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

/// Why the current clip is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekKind {
    /// The previous clip finished; keep the transport mode.
    NaturalAdvance,
    /// The user picked a clip or a time.
    ExplicitSeek,
}

/// Read-only view of where playback is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCursor {
    pub active_buffer: BufferId,
    pub current_index: Option<usize>,
    pub elapsed_within_clip: f64,
}

/// Notifications for the caller, drained with `PlaybackController::drain_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    IndexChanged(usize),
    /// Cumulative timeline position of the active clip.
    TimeUpdate { index: usize, position: f64 },
    /// The last clip finished.
    Ended,
    /// A buffer failed to load or play this clip.
    MediaFailed {
        index: usize,
        segment_id: SegmentId,
        url: String,
        reason: String,
    },
}

struct BufferSlot<B> {
    buffer: B,
    /// Last URL handed to `load`.
    loaded_url: Option<String>,
    /// The clip in this buffer already reached its out point. Until the next
    /// clip's progress shows up, `ended` and late time updates belong to the
    /// old clip.
    finished: bool,
}

/// Dual-buffer playback controller.
pub struct PlaybackController<B: MediaBuffer> {
    slots: [BufferSlot<B>; 2],
    active: BufferId,
    items: Vec<PlaybackItem>,
    state: PlaybackState,
    current_index: Option<usize>,
    /// Index sitting loaded in the inactive buffer.
    preloaded_index: Option<usize>,
    elapsed: f64,
    autoplay: bool,
    volume: f32,
    muted: bool,
    controls_visible: bool,
    events: Vec<PlaybackEvent>,
}

impl<B: MediaBuffer> PlaybackController<B> {
    /// Create a controller over two buffers. Buffer A starts active.
    pub fn new(a: B, b: B) -> Self {
        let mut controller = Self {
            slots: [
                BufferSlot {
                    buffer: a,
                    loaded_url: None,
                    finished: false,
                },
                BufferSlot {
                    buffer: b,
                    loaded_url: None,
                    finished: false,
                },
            ],
            active: BufferId::A,
            items: Vec::new(),
            state: PlaybackState::Idle,
            current_index: None,
            preloaded_index: None,
            elapsed: 0.0,
            autoplay: true,
            volume: 1.0,
            muted: false,
            controls_visible: true,
            events: Vec::new(),
        };
        controller.present_active();
        controller
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn active_buffer(&self) -> BufferId {
        self.active
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn preloaded_index(&self) -> Option<usize> {
        self.preloaded_index
    }

    pub fn items(&self) -> &[PlaybackItem] {
        &self.items
    }

    pub fn buffer(&self, id: BufferId) -> &B {
        &self.slots[id.index()].buffer
    }

    pub fn cursor(&self) -> PlaybackCursor {
        PlaybackCursor {
            active_buffer: self.active,
            current_index: self.current_index,
            elapsed_within_clip: self.elapsed,
        }
    }

    /// Cumulative timeline position.
    pub fn position(&self) -> f64 {
        self.current_item()
            .map(|item| item.cumulative_start + self.elapsed)
            .unwrap_or(0.0)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Take all pending notifications.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    fn current_item(&self) -> Option<&PlaybackItem> {
        self.current_index.and_then(|i| self.items.get(i))
    }

    fn slot(&self, id: BufferId) -> &BufferSlot<B> {
        &self.slots[id.index()]
    }

    fn slot_mut(&mut self, id: BufferId) -> &mut BufferSlot<B> {
        &mut self.slots[id.index()]
    }

    // ── Sequence ───────────────────────────────────────────────

    /// Replace the sequence after an order or trim change.
    ///
    /// The clip that is currently playing keeps playing (tracked by segment
    /// id); if it disappeared, playback jumps to the clip now at the same
    /// position.
    pub fn set_playlist(&mut self, items: Vec<PlaybackItem>) {
        let previous_index = self.current_index;
        let previous_item = self.current_item().cloned();
        let current_id = previous_item.as_ref().map(|item| item.segment_id);
        self.items = items;
        self.preloaded_index = None;

        if self.items.is_empty() {
            if previous_index.is_some() {
                self.slot_mut(self.active).buffer.pause();
            }
            self.current_index = None;
            self.elapsed = 0.0;
            self.state = PlaybackState::Idle;
            return;
        }

        let Some(previous) = previous_index else {
            return;
        };

        match current_id.and_then(|id| self.items.iter().position(|i| i.segment_id == id)) {
            Some(index) => {
                self.current_index = Some(index);
                if index != previous {
                    self.events.push(PlaybackEvent::IndexChanged(index));
                }
                if let (Some(old), Some(item)) = (previous_item, self.items.get(index).cloned()) {
                    self.retrim_current(&old, &item);
                }
                self.ensure_preload();
            }
            None => {
                let index = previous.min(self.items.len() - 1);
                debug!("Current clip left the playlist, moving to index {}", index);
                let resume = self.state == PlaybackState::Playing;
                self.current_index = None;
                self.go_to(index, 0.0, SeekKind::ExplicitSeek, resume);
            }
        }
    }

    /// Keep the source position of the current clip inside its new trim range.
    fn retrim_current(&mut self, old: &PlaybackItem, item: &PlaybackItem) {
        if old.trim_in == item.trim_in && old.out_point == item.out_point {
            self.elapsed = self.elapsed.min(item.duration);
            return;
        }
        let source_time = old.trim_in + self.elapsed;
        let clamped = source_time.clamp(item.trim_in, item.out_point.max(item.trim_in));
        if clamped != source_time {
            debug!(
                "Current clip retrimmed, seeking buffer {} from {:.3}s to {:.3}s",
                self.active, source_time, clamped
            );
            self.slot_mut(self.active).buffer.seek(clamped);
        }
        self.elapsed = (clamped - item.trim_in).clamp(0.0, item.duration);
    }

    /// Make `index` the current clip.
    pub fn set_current_index(&mut self, index: usize, kind: SeekKind) {
        if index >= self.items.len() {
            warn!(
                "Ignoring seek to clip {} of a {}-clip playlist",
                index,
                self.items.len()
            );
            return;
        }
        let resume = self.resume_after(kind);
        self.go_to(index, 0.0, kind, resume);
    }

    /// Seek to a cumulative timeline time.
    pub fn seek_to_time(&mut self, time: f64) {
        let Some((index, offset)) = self.locate(time) else {
            return;
        };

        if self.current_index == Some(index) {
            let Some(item) = self.items.get(index) else {
                return;
            };
            let source_time = item.trim_in + offset;
            let position = item.cumulative_start + offset;
            self.slot_mut(self.active).buffer.seek(source_time);
            self.elapsed = offset;
            if self.state == PlaybackState::Ended {
                self.state = PlaybackState::Paused;
            }
            self.events
                .push(PlaybackEvent::TimeUpdate { index, position });
            return;
        }

        let resume = self.resume_after(SeekKind::ExplicitSeek);
        self.go_to(index, offset, SeekKind::ExplicitSeek, resume);
    }

    fn locate(&self, time: f64) -> Option<(usize, f64)> {
        if self.items.is_empty() {
            return None;
        }
        let index = self
            .items
            .partition_point(|item| item.end() <= time)
            .min(self.items.len() - 1);
        let item = &self.items[index];
        let offset = if time.is_finite() {
            (time - item.cumulative_start).clamp(0.0, item.duration)
        } else {
            0.0
        };
        Some((index, offset))
    }

    fn resume_after(&self, kind: SeekKind) -> bool {
        match (kind, self.state) {
            (SeekKind::NaturalAdvance, state) => state == PlaybackState::Playing,
            (SeekKind::ExplicitSeek, PlaybackState::Playing) => true,
            (SeekKind::ExplicitSeek, PlaybackState::Paused) => false,
            (SeekKind::ExplicitSeek, PlaybackState::Idle | PlaybackState::Ended) => self.autoplay,
        }
    }

    fn go_to(&mut self, index: usize, offset: f64, kind: SeekKind, resume: bool) {
        let Some(item) = self.items.get(index).cloned() else {
            return;
        };
        let inactive = self.active.other();
        let preloaded = self.preloaded_index == Some(index)
            && self.slot(inactive).loaded_url.as_deref() == Some(item.url.as_str());

        if preloaded {
            self.slot_mut(self.active).buffer.pause();
            self.active = inactive;
            self.slot_mut(inactive).finished = false;
            self.present_active();
            if offset > 0.0 {
                self.slot_mut(self.active).buffer.seek(item.trim_in + offset);
            }
            debug!("Swapped to buffer {} for clip {}", self.active, index);
        } else {
            if kind == SeekKind::NaturalAdvance {
                debug!("Clip {} was not preloaded, loading directly", index);
            }
            let slot = self.slot_mut(self.active);
            slot.buffer.pause();
            if slot.loaded_url.as_deref() != Some(item.url.as_str()) {
                slot.buffer.load(&item.url);
                slot.loaded_url = Some(item.url.clone());
            }
            slot.buffer.seek(item.trim_in + offset);
            debug!("Loaded clip {} into buffer {}", index, self.active);
        }

        self.preloaded_index = None;
        let changed = self.current_index != Some(index);
        self.current_index = Some(index);
        self.elapsed = offset;
        if changed {
            self.events.push(PlaybackEvent::IndexChanged(index));
        }

        if resume {
            self.start_active();
        } else {
            self.state = PlaybackState::Paused;
        }

        self.ensure_preload();
    }

    /// Park the clip after the current one in the inactive buffer.
    fn ensure_preload(&mut self) {
        let Some(current) = self.current_index else {
            return;
        };
        let next = current + 1;
        let Some(item) = self.items.get(next).cloned() else {
            self.preloaded_index = None;
            return;
        };
        if self.preloaded_index == Some(next) {
            return;
        }

        let slot = self.slot_mut(self.active.other());
        if slot.loaded_url.as_deref() != Some(item.url.as_str()) {
            slot.buffer.load(&item.url);
            slot.loaded_url = Some(item.url.clone());
        }
        slot.buffer.seek(item.trim_in);
        self.preloaded_index = Some(next);
        debug!("Preloaded clip {} into buffer {}", next, self.active.other());
    }

    fn finish_clip(&mut self) {
        let Some(index) = self.current_index else {
            return;
        };
        let active = self.active;
        self.slot_mut(active).finished = true;
        if index + 1 < self.items.len() {
            let resume = self.resume_after(SeekKind::NaturalAdvance);
            self.go_to(index + 1, 0.0, SeekKind::NaturalAdvance, resume);
        } else {
            self.slot_mut(self.active).buffer.pause();
            if let Some(item) = self.items.get(index) {
                self.elapsed = item.duration;
            }
            self.state = PlaybackState::Ended;
            self.events.push(PlaybackEvent::Ended);
            info!("Playback reached the end of the timeline");
        }
    }

    // ── Transport ──────────────────────────────────────────────

    /// Start or resume the sequence. A finished sequence restarts from the top.
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Playing => {}
            PlaybackState::Paused => self.start_active(),
            PlaybackState::Idle => {
                if self.items.is_empty() {
                    return;
                }
                let index = self.current_index.unwrap_or(0).min(self.items.len() - 1);
                self.go_to(index, self.elapsed, SeekKind::ExplicitSeek, true);
            }
            PlaybackState::Ended => {
                if !self.items.is_empty() {
                    self.go_to(0, 0.0, SeekKind::ExplicitSeek, true);
                }
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.slot_mut(self.active).buffer.pause();
            self.state = PlaybackState::Paused;
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    fn start_active(&mut self) {
        let active = self.active;
        match self.slot_mut(active).buffer.play() {
            Ok(()) => self.state = PlaybackState::Playing,
            Err(e) => {
                warn!("Buffer {} refused to play: {}", active, e);
                self.state = PlaybackState::Paused;
                self.report_failure(active, e.to_string());
            }
        }
    }

    // ── Buffer events ──────────────────────────────────────────

    /// Feed a media event from one of the buffers.
    pub fn handle_buffer_event(&mut self, id: BufferId, event: BufferEvent) {
        match event {
            BufferEvent::CanPlay => debug!("Buffer {} can play", id),
            BufferEvent::TimeUpdate(source_time) if id == self.active => {
                self.on_time_update(source_time)
            }
            BufferEvent::Ended if id == self.active => {
                if std::mem::take(&mut self.slot_mut(id).finished) {
                    debug!("Ignoring ended from buffer {} for a clip already finished", id);
                } else if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
                    self.finish_clip();
                }
            }
            BufferEvent::Error(reason) => {
                warn!("Buffer {} failed: {}", id, reason);
                if id == self.active {
                    self.slot_mut(id).buffer.pause();
                    if self.state == PlaybackState::Playing {
                        self.state = PlaybackState::Paused;
                    }
                } else {
                    self.slot_mut(id).loaded_url = None;
                }
                self.report_failure(id, reason);
                if id != self.active {
                    self.preloaded_index = None;
                }
            }
            // Events from the parked buffer carry no meaning.
            BufferEvent::TimeUpdate(_) | BufferEvent::Ended => {}
        }
    }

    fn on_time_update(&mut self, source_time: f64) {
        let Some(index) = self.current_index else {
            return;
        };
        let Some(item) = self.items.get(index) else {
            return;
        };
        let past_out_point = source_time >= item.out_point - OUT_POINT_EPSILON;
        let elapsed = (source_time - item.trim_in).clamp(0.0, item.duration);
        let position = item.cumulative_start + elapsed;

        let slot = self.slot_mut(self.active);
        if slot.finished {
            if past_out_point {
                return;
            }
            slot.finished = false;
        }

        self.elapsed = elapsed;
        if self.state == PlaybackState::Playing && past_out_point {
            self.finish_clip();
        } else {
            self.events
                .push(PlaybackEvent::TimeUpdate { index, position });
        }
    }

    fn report_failure(&mut self, id: BufferId, reason: String) {
        let index = if id == self.active {
            self.current_index
        } else {
            self.preloaded_index
        };
        let Some(index) = index else {
            return;
        };
        if let Some(item) = self.items.get(index) {
            self.events.push(PlaybackEvent::MediaFailed {
                index,
                segment_id: item.segment_id,
                url: item.url.clone(),
                reason,
            });
        }
    }

    // ── Presentation ───────────────────────────────────────────

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        let v = self.volume;
        self.slot_mut(self.active).buffer.set_volume(v);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.slot_mut(self.active).buffer.set_muted(muted);
    }

    pub fn set_controls_visible(&mut self, visible: bool) {
        self.controls_visible = visible;
        self.slot_mut(self.active).buffer.set_presented(true, visible);
    }

    /// Mirror volume, mute, and controls onto the active buffer; silence and
    /// hide the other.
    fn present_active(&mut self) {
        let (volume, muted, controls) = (self.volume, self.muted, self.controls_visible);
        let active = &mut self.slots[self.active.index()].buffer;
        active.set_volume(volume);
        active.set_muted(muted);
        active.set_presented(true, controls);

        let inactive = &mut self.slots[self.active.other().index()].buffer;
        inactive.set_muted(true);
        inactive.set_presented(false, false);
    }
}

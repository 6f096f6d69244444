//! Integration tests for gapless playback over a computed timeline.

use std::cell::RefCell;
use std::rc::Rc;

use segline_core::Result;
use segline_media::{
    BufferEvent, BufferId, MediaBuffer, PlaybackController, PlaybackEvent, PlaybackItem,
    PlaybackState, SeekKind,
};
use segline_timeline::{TimelineModel, TrimRange};

use crate::fixtures::three_clip_model;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String),
    Play,
    Pause,
    Seek(f64),
}

/// Buffer that records every call into a log shared with the test.
struct RecordingBuffer {
    calls: Rc<RefCell<Vec<Call>>>,
    presented: Rc<RefCell<bool>>,
}

impl MediaBuffer for RecordingBuffer {
    fn load(&mut self, url: &str) {
        self.calls.borrow_mut().push(Call::Load(url.to_string()));
    }

    fn play(&mut self) -> Result<()> {
        self.calls.borrow_mut().push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.borrow_mut().push(Call::Seek(seconds));
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}

    fn set_presented(&mut self, presented: bool, _controls_visible: bool) {
        *self.presented.borrow_mut() = presented;
    }
}

struct Harness {
    controller: PlaybackController<RecordingBuffer>,
    calls: [Rc<RefCell<Vec<Call>>>; 2],
    presented: [Rc<RefCell<bool>>; 2],
}

impl Harness {
    fn new(model: &TimelineModel) -> Self {
        let calls = [Rc::default(), Rc::default()];
        let presented = [Rc::default(), Rc::default()];
        let buffer = |i: usize| RecordingBuffer {
            calls: Rc::clone(&calls[i]),
            presented: Rc::clone(&presented[i]),
        };
        let mut controller = PlaybackController::new(buffer(0), buffer(1));
        controller.set_playlist(PlaybackItem::from_clips(model.clips()));
        Self {
            controller,
            calls,
            presented,
        }
    }

    fn loads(&self) -> usize {
        self.calls
            .iter()
            .map(|log| {
                log.borrow()
                    .iter()
                    .filter(|c| matches!(c, Call::Load(_)))
                    .count()
            })
            .sum()
    }

    fn calls(&self, id: BufferId) -> Vec<Call> {
        self.calls[slot(id)].borrow().clone()
    }

    fn presented(&self, id: BufferId) -> bool {
        *self.presented[slot(id)].borrow()
    }

    /// Report the active buffer reaching the current clip's out point.
    fn finish_current(&mut self) {
        let index = self.controller.current_index().unwrap();
        let out_point = self.controller.items()[index].out_point;
        let active = self.controller.active_buffer();
        self.controller
            .handle_buffer_event(active, BufferEvent::TimeUpdate(out_point));
    }
}

fn slot(id: BufferId) -> usize {
    match id {
        BufferId::A => 0,
        BufferId::B => 1,
    }
}

fn four_clip_model() -> TimelineModel {
    let mut segments = crate::fixtures::three_clip_segments();
    segments.push(segline_core::Segment::done(
        2,
        1,
        2.0,
        "https://cdn.example/s2-1.mp4",
    ));
    TimelineModel::from_segments(segments)
}

#[test]
fn natural_advance_swaps_preloaded_buffers() {
    let model = four_clip_model();
    let mut h = Harness::new(&model);

    h.controller.set_current_index(0, SeekKind::ExplicitSeek);
    assert_eq!(h.controller.state(), PlaybackState::Playing);
    assert_eq!(h.controller.preloaded_index(), Some(1));

    for expected in 1..4 {
        let before = h.controller.active_buffer();
        h.finish_current();
        assert_eq!(h.controller.current_index(), Some(expected));
        assert_eq!(h.controller.active_buffer(), before.other());
        assert!(h.controller.is_playing());
    }

    // One load for the first clip plus one preload per following clip.
    assert_eq!(h.loads(), 4);
    assert_eq!(h.controller.preloaded_index(), None);

    h.finish_current();
    assert_eq!(h.controller.state(), PlaybackState::Ended);
    assert!(h.controller.drain_events().contains(&PlaybackEvent::Ended));
}

#[test]
fn only_the_active_buffer_is_presented() {
    let model = three_clip_model();
    let mut h = Harness::new(&model);

    h.controller.set_current_index(0, SeekKind::ExplicitSeek);
    assert!(h.presented(BufferId::A));
    assert!(!h.presented(BufferId::B));

    h.finish_current();
    assert!(h.presented(BufferId::B));
    assert!(!h.presented(BufferId::A));
}

#[test]
fn trimmed_clip_starts_at_trim_in_and_ends_at_out_point() {
    let mut model = three_clip_model();
    let second = model.order()[1];
    model.set_trim(second, TrimRange::new(0.75, 1.0));
    let mut h = Harness::new(&model);

    h.controller.set_current_index(0, SeekKind::ExplicitSeek);
    // The next clip is parked at its in point.
    assert_eq!(h.calls(BufferId::B).last(), Some(&Call::Seek(0.75)));
    assert_eq!(h.controller.items()[1].out_point, 2.0);

    h.finish_current();
    h.controller.drain_events();
    let active = h.controller.active_buffer();
    h.controller
        .handle_buffer_event(active, BufferEvent::TimeUpdate(1.5));
    assert_eq!(h.controller.current_index(), Some(1));
    assert_eq!(h.controller.position(), 5.75);

    h.controller
        .handle_buffer_event(active, BufferEvent::TimeUpdate(2.0));
    assert_eq!(h.controller.current_index(), Some(2));
}

#[test]
fn seek_by_time_picks_clip_and_offset() {
    let model = three_clip_model();
    let mut h = Harness::new(&model);

    h.controller.seek_to_time(9.0);
    assert_eq!(h.controller.current_index(), Some(2));
    assert_eq!(h.controller.cursor().elapsed_within_clip, 1.0);
    assert_eq!(h.controller.position(), 9.0);
    assert_eq!(h.calls(BufferId::A).last(), Some(&Call::Play));
    assert!(h.calls(BufferId::A).contains(&Call::Seek(1.0)));
}

#[test]
fn explicit_seek_while_paused_stays_paused() {
    let model = three_clip_model();
    let mut h = Harness::new(&model);

    h.controller.set_current_index(0, SeekKind::ExplicitSeek);
    h.controller.pause();
    h.controller.set_current_index(2, SeekKind::ExplicitSeek);
    assert_eq!(h.controller.state(), PlaybackState::Paused);
    assert_eq!(h.controller.current_index(), Some(2));
}

#[test]
fn reorder_keeps_current_clip_playing() {
    let mut model = three_clip_model();
    let mut h = Harness::new(&model);
    h.controller.set_current_index(1, SeekKind::ExplicitSeek);
    let playing = model.order()[1];

    model.reorder(playing, 0);
    h.controller
        .set_playlist(PlaybackItem::from_clips(model.clips()));

    assert_eq!(h.controller.current_index(), Some(0));
    assert_eq!(h.controller.items()[0].segment_id, playing);
    assert!(h.controller.is_playing());
    assert_eq!(h.controller.preloaded_index(), Some(1));
}

#[test]
fn end_reported_twice_advances_once() {
    let model = three_clip_model();
    let mut h = Harness::new(&model);
    h.controller.set_current_index(0, SeekKind::ExplicitSeek);

    h.finish_current();
    h.controller.handle_buffer_event(BufferId::A, BufferEvent::Ended);
    assert_eq!(h.controller.current_index(), Some(1));
    assert_eq!(h.controller.active_buffer(), BufferId::B);
}

#[test]
fn late_end_after_failed_preload_does_not_skip_a_clip() {
    let model = three_clip_model();
    let mut h = Harness::new(&model);
    h.controller.set_current_index(0, SeekKind::ExplicitSeek);
    h.controller
        .handle_buffer_event(BufferId::B, BufferEvent::Error("404".into()));

    // Clip 0 reaches its out point; clip 1 is loaded into A directly and the
    // element then reports the end of clip 0.
    h.finish_current();
    assert_eq!(h.controller.current_index(), Some(1));
    assert_eq!(h.controller.active_buffer(), BufferId::A);
    h.controller
        .handle_buffer_event(BufferId::A, BufferEvent::TimeUpdate(5.0));
    h.controller.handle_buffer_event(BufferId::A, BufferEvent::Ended);

    assert_eq!(h.controller.current_index(), Some(1));
    assert!(h.controller.is_playing());
    assert!(h
        .calls(BufferId::A)
        .contains(&Call::Load("https://cdn.example/s1-1.mp4".into())));

    h.controller
        .handle_buffer_event(BufferId::A, BufferEvent::TimeUpdate(1.0));
    assert_eq!(h.controller.position(), 6.0);
    h.finish_current();
    assert_eq!(h.controller.current_index(), Some(2));
}

#[test]
fn retrimming_the_playing_clip_moves_its_buffer_into_range() {
    let mut model = three_clip_model();
    let first = model.order()[0];
    let mut h = Harness::new(&model);
    h.controller.set_current_index(0, SeekKind::ExplicitSeek);
    h.controller
        .handle_buffer_event(BufferId::A, BufferEvent::TimeUpdate(1.0));

    model.set_trim(first, TrimRange::new(2.0, 0.0));
    h.controller
        .set_playlist(PlaybackItem::from_clips(model.clips()));
    assert_eq!(h.calls(BufferId::A).last(), Some(&Call::Seek(2.0)));
    assert_eq!(h.controller.cursor().elapsed_within_clip, 0.0);
    assert!(h.controller.is_playing());

    // A shortened tail takes effect at the new out point.
    model.set_trim(first, TrimRange::new(2.0, 2.5));
    h.controller
        .set_playlist(PlaybackItem::from_clips(model.clips()));
    assert_eq!(h.controller.items()[0].out_point, 2.5);
    h.controller
        .handle_buffer_event(BufferId::A, BufferEvent::TimeUpdate(2.5));
    assert_eq!(h.controller.current_index(), Some(1));
}

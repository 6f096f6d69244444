//! Integration tests for the background audio track following playback.

use std::cell::RefCell;
use std::rc::Rc;

use segline_audio::{AudioElement, AudioTrackSync};
use segline_core::{EngineConfig, Result};
use segline_timeline::TrimRange;

use crate::fixtures::three_clip_model;

#[derive(Default)]
struct ElementState {
    position: f64,
    playing: bool,
}

/// Audio element whose transport the test can move by hand.
#[derive(Clone)]
struct SharedElement {
    state: Rc<RefCell<ElementState>>,
    duration: Option<f64>,
}

impl SharedElement {
    fn new(duration: Option<f64>) -> Self {
        Self {
            state: Rc::default(),
            duration,
        }
    }
}

impl AudioElement for SharedElement {
    fn load(&mut self, _url: &str) {}

    fn play(&mut self) -> Result<()> {
        self.state.borrow_mut().playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.state.borrow_mut().position = seconds;
    }

    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }
}

#[test]
fn audio_follows_cumulative_position_across_trims() {
    let mut model = three_clip_model();
    let first = model.order()[0];
    model.set_trim(first, TrimRange::new(2.0, 0.0));

    let element = SharedElement::new(None);
    let state = Rc::clone(&element.state);
    let mut sync = AudioTrackSync::from_config(&EngineConfig::default());
    sync.attach(element, "https://cdn.example/score.mp3");

    // Halfway through the second clip, which now starts at 3 s.
    let second_clip = &model.clips()[1];
    let video_time = second_clip.cumulative_start + 1.5;
    sync.seek_to(video_time);
    sync.play();
    assert_eq!(state.borrow().position, 4.5);
    assert!(state.borrow().playing);

    // Small drift is tolerated, large drift is corrected.
    state.borrow_mut().position = 4.6;
    assert!(!sync.reconcile(4.5));
    state.borrow_mut().position = 5.5;
    assert!(sync.reconcile(4.5));
    assert_eq!(state.borrow().position, 4.5);

    sync.pause();
    assert!(!state.borrow().playing);
}

#[test]
fn audio_shorter_than_timeline_goes_silent_then_recovers() {
    let model = three_clip_model();
    let element = SharedElement::new(Some(6.0));
    let state = Rc::clone(&element.state);
    let mut sync = AudioTrackSync::new(0.25);
    sync.attach(element, "https://cdn.example/sting.mp3");
    sync.play();

    sync.seek_to(model.clips()[2].cumulative_start);
    assert!(!state.borrow().playing);
    assert!(!sync.reconcile(9.0));

    sync.seek_to(model.clips()[0].cumulative_start);
    assert!(state.borrow().playing);
    assert_eq!(state.borrow().position, 0.0);
}

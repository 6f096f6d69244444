//! Time-to-pixel mapping for the timeline: zoom, fit, and horizontal scroll.

use segline_core::EngineConfig;
use serde::{Deserialize, Serialize};

/// Scale and scroll remembered before a fit, restored by the next toggle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct SavedView {
    pixels_per_second: f32,
    scroll_px: f32,
}

/// Horizontal viewport over the timeline.
///
/// Pixel positions are relative to the left edge of the clip area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineScale {
    pixels_per_second: f32,
    scroll_px: f32,
    min_pixels_per_second: f32,
    max_pixels_per_second: f32,
    zoom_factor: f32,
    fit_margin_px: f32,
    #[serde(default)]
    saved_view: Option<SavedView>,
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl TimelineScale {
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut scale = Self {
            pixels_per_second: config.default_pixels_per_second,
            scroll_px: 0.0,
            min_pixels_per_second: config.min_pixels_per_second,
            max_pixels_per_second: config.max_pixels_per_second.max(config.min_pixels_per_second),
            zoom_factor: config.zoom_factor.max(1.01),
            fit_margin_px: config.fit_margin_px,
            saved_view: None,
        };
        scale.pixels_per_second = scale.clamp_pps(scale.pixels_per_second);
        scale
    }

    pub fn pixels_per_second(&self) -> f32 {
        self.pixels_per_second
    }

    pub fn scroll_px(&self) -> f32 {
        self.scroll_px
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// Whether the next fit toggle restores a remembered view.
    pub fn is_fitted(&self) -> bool {
        self.saved_view.is_some()
    }

    fn clamp_pps(&self, pps: f32) -> f32 {
        if pps.is_finite() {
            pps.clamp(self.min_pixels_per_second, self.max_pixels_per_second)
        } else {
            self.min_pixels_per_second
        }
    }

    // ── Mapping ────────────────────────────────────────────────

    /// Timeline time to a pixel offset in the viewport.
    pub fn time_to_x(&self, time: f64) -> f32 {
        time as f32 * self.pixels_per_second - self.scroll_px
    }

    /// Viewport pixel offset to a timeline time, never negative.
    pub fn x_to_time(&self, x: f32) -> f64 {
        (((x + self.scroll_px) / self.pixels_per_second) as f64).max(0.0)
    }

    /// Seconds to a pixel length.
    pub fn duration_to_width(&self, seconds: f64) -> f32 {
        seconds as f32 * self.pixels_per_second
    }

    /// Full content width for a timeline of `total` seconds.
    pub fn content_width(&self, total: f64) -> f32 {
        self.duration_to_width(total)
    }

    // ── Zoom ───────────────────────────────────────────────────

    /// Set the scale directly, keeping the left edge time fixed.
    pub fn set_pixels_per_second(&mut self, pps: f32) {
        self.zoom_around(0.0, self.clamp_pps(pps));
    }

    pub fn zoom_in(&mut self) {
        self.saved_view = None;
        self.set_pixels_per_second(self.pixels_per_second * self.zoom_factor);
    }

    pub fn zoom_out(&mut self) {
        self.saved_view = None;
        self.set_pixels_per_second(self.pixels_per_second / self.zoom_factor);
    }

    /// Zoom by `steps` factor steps keeping the time under `anchor_x` on the
    /// same pixel. Positive steps zoom in.
    pub fn zoom_at(&mut self, anchor_x: f32, steps: f32) {
        if steps == 0.0 || !steps.is_finite() {
            return;
        }
        self.saved_view = None;
        let target = self.clamp_pps(self.pixels_per_second * self.zoom_factor.powf(steps));
        self.zoom_around(anchor_x, target);
    }

    fn zoom_around(&mut self, anchor_x: f32, pps: f32) {
        let anchor_time = (anchor_x + self.scroll_px) / self.pixels_per_second;
        self.pixels_per_second = pps;
        self.scroll_px = (anchor_time * pps - anchor_x).max(0.0);
    }

    /// Scale so the whole timeline fits in `viewport_width`, scrolled to the start.
    pub fn fit_to_width(&mut self, viewport_width: f32, total: f64) {
        if !(total > 0.0) || !(viewport_width > 0.0) {
            return;
        }
        let usable = (viewport_width - self.fit_margin_px).max(1.0);
        self.pixels_per_second = self.clamp_pps(usable / total as f32);
        self.scroll_px = 0.0;
    }

    /// First call fits and remembers the current view; the next call restores it.
    pub fn toggle_fit(&mut self, viewport_width: f32, total: f64) {
        match self.saved_view.take() {
            Some(saved) => {
                self.pixels_per_second = self.clamp_pps(saved.pixels_per_second);
                self.scroll_px = saved.scroll_px.max(0.0);
            }
            None => {
                let saved = SavedView {
                    pixels_per_second: self.pixels_per_second,
                    scroll_px: self.scroll_px,
                };
                self.fit_to_width(viewport_width, total);
                self.saved_view = Some(saved);
            }
        }
    }

    // ── Scroll ─────────────────────────────────────────────────

    pub fn set_scroll(&mut self, scroll_px: f32) {
        self.scroll_px = if scroll_px.is_finite() {
            scroll_px.max(0.0)
        } else {
            0.0
        };
    }

    pub fn scroll_by(&mut self, delta_px: f32) {
        self.set_scroll(self.scroll_px + delta_px);
    }

    /// Keep the scroll inside the content.
    pub fn clamp_scroll(&mut self, viewport_width: f32, total: f64) {
        let max = (self.content_width(total) - viewport_width).max(0.0);
        self.scroll_px = self.scroll_px.clamp(0.0, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fit_to_width() {
        let mut scale = TimelineScale::default();
        scale.fit_to_width(800.0, 40.0);
        assert_eq!(scale.pixels_per_second(), 19.0);
        assert_eq!(scale.scroll_px(), 0.0);
    }

    #[test]
    fn test_fit_clamps_to_range() {
        let mut scale = TimelineScale::default();
        scale.fit_to_width(800.0, 0.5);
        assert_eq!(scale.pixels_per_second(), 300.0);
        scale.fit_to_width(800.0, 100_000.0);
        assert_eq!(scale.pixels_per_second(), 2.0);
    }

    #[test]
    fn test_fit_on_empty_timeline_is_noop() {
        let mut scale = TimelineScale::default();
        scale.fit_to_width(800.0, 0.0);
        assert_eq!(scale.pixels_per_second(), 40.0);
    }

    #[test]
    fn test_toggle_fit_restores() {
        let mut scale = TimelineScale::default();
        scale.zoom_in();
        scale.set_scroll(250.0);
        let before = (scale.pixels_per_second(), scale.scroll_px());

        scale.toggle_fit(800.0, 40.0);
        assert_eq!(scale.pixels_per_second(), 19.0);
        assert!(scale.is_fitted());

        scale.toggle_fit(800.0, 40.0);
        assert_eq!((scale.pixels_per_second(), scale.scroll_px()), before);
        assert!(!scale.is_fitted());
    }

    #[test]
    fn test_manual_zoom_forgets_saved_view() {
        let mut scale = TimelineScale::default();
        scale.toggle_fit(800.0, 40.0);
        scale.zoom_in();
        assert!(!scale.is_fitted());
        scale.toggle_fit(800.0, 40.0);
        assert_eq!(scale.pixels_per_second(), 19.0);
    }

    #[test]
    fn test_zoom_in_out_factor_and_limits() {
        let mut scale = TimelineScale::default();
        scale.zoom_in();
        assert!((scale.pixels_per_second() - 52.0).abs() < 1e-3);
        scale.zoom_out();
        assert!((scale.pixels_per_second() - 40.0).abs() < 1e-3);

        for _ in 0..50 {
            scale.zoom_in();
        }
        assert_eq!(scale.pixels_per_second(), 300.0);
        for _ in 0..50 {
            scale.zoom_out();
        }
        assert_eq!(scale.pixels_per_second(), 2.0);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_time() {
        let mut scale = TimelineScale::default();
        scale.set_scroll(120.0);
        let anchor_x = 300.0;
        let time_before = scale.x_to_time(anchor_x);

        scale.zoom_at(anchor_x, 2.0);
        let time_after = scale.x_to_time(anchor_x);
        assert!((time_before - time_after).abs() < 1e-4);

        scale.zoom_at(anchor_x, -1.0);
        assert!((scale.x_to_time(anchor_x) - time_before).abs() < 1e-4);
    }

    #[test]
    fn test_mapping_roundtrip() {
        let mut scale = TimelineScale::default();
        scale.set_scroll(80.0);
        assert_eq!(scale.time_to_x(10.0), 320.0);
        assert_eq!(scale.x_to_time(320.0), 10.0);
        assert_eq!(scale.x_to_time(-500.0), 0.0);
    }

    #[test]
    fn test_clamp_scroll() {
        let mut scale = TimelineScale::default();
        scale.set_scroll(10_000.0);
        scale.clamp_scroll(400.0, 20.0);
        assert_eq!(scale.scroll_px(), 400.0);
        scale.set_scroll(-5.0);
        assert_eq!(scale.scroll_px(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_zoom_stays_in_range_and_keeps_anchor(
            steps in prop::collection::vec(-3.0f32..3.0, 1..20),
            anchor in 0.0f32..800.0,
            scroll in 0.0f32..5000.0,
        ) {
            let mut scale = TimelineScale::default();
            scale.set_scroll(scroll);
            for step in steps {
                let before = scale.x_to_time(anchor);
                let pps_before = scale.pixels_per_second();
                scale.zoom_at(anchor, step);
                let pps = scale.pixels_per_second();
                prop_assert!((2.0..=300.0).contains(&pps));
                // Anchoring holds whenever the scroll did not hit zero.
                if scale.scroll_px() > 0.0 {
                    let drift = (scale.x_to_time(anchor) - before).abs();
                    prop_assert!(drift < 1e-2, "drift {} at {} -> {}", drift, pps_before, pps);
                }
            }
        }
    }
}

//! Dark editor palette and spacing.

use egui::{Color32, Rounding, Stroke};

pub struct Theme;

impl Theme {
    // ── Typography ─────────────────────────────────────────────
    pub const FONT_XS: f32 = 11.0;
    pub const FONT_SM: f32 = 13.0;

    // ── Spacing ────────────────────────────────────────────────
    pub const SPACE_XS: f32 = 4.0;
    pub const SPACE_SM: f32 = 8.0;
    pub const SPACE_MD: f32 = 16.0;

    pub const RADIUS: f32 = 4.0;
    pub const STROKE_SUBTLE: f32 = 0.5;

    // ── Timeline geometry ──────────────────────────────────────
    pub const RULER_HEIGHT: f32 = 22.0;
    pub const SCENE_LANE_HEIGHT: f32 = 16.0;
    pub const CLIP_LANE_HEIGHT: f32 = 56.0;
    pub const MIN_CLIP_WIDTH: f32 = 3.0;

    // ── Colors ─────────────────────────────────────────────────
    pub const fn bg() -> Color32 {
        Color32::from_rgb(18, 18, 22)
    }
    pub const fn bg1() -> Color32 {
        Color32::from_rgb(28, 28, 34)
    }
    pub const fn bg2() -> Color32 {
        Color32::from_rgb(35, 35, 42)
    }
    pub const fn t1() -> Color32 {
        Color32::from_rgba_premultiplied(235, 235, 235, 235)
    }
    pub const fn t3() -> Color32 {
        Color32::from_rgba_premultiplied(89, 89, 89, 89)
    }
    pub const fn white_10() -> Color32 {
        Color32::from_rgba_premultiplied(26, 26, 26, 26)
    }
    pub const fn accent() -> Color32 {
        Color32::from_rgb(86, 130, 255)
    }
    pub const fn red() -> Color32 {
        Color32::from_rgb(255, 88, 85)
    }
    pub const fn amber() -> Color32 {
        Color32::from_rgb(255, 184, 48)
    }
    pub const fn cyan() -> Color32 {
        Color32::from_rgb(34, 211, 238)
    }

    /// Return a color with replaced alpha.
    pub const fn with_alpha(c: Color32, a: u8) -> Color32 {
        Color32::from_rgba_premultiplied(
            (c.r() as u16 * a as u16 / 255) as u8,
            (c.g() as u16 * a as u16 / 255) as u8,
            (c.b() as u16 * a as u16 / 255) as u8,
            a,
        )
    }

    /// Alternating hue per scene so neighbouring scenes read apart.
    pub fn scene_color(scene_number: u32) -> Color32 {
        const PALETTE: [Color32; 5] = [
            Color32::from_rgb(86, 130, 255),
            Color32::from_rgb(48, 213, 160),
            Color32::from_rgb(167, 139, 250),
            Color32::from_rgb(244, 114, 182),
            Color32::from_rgb(255, 184, 48),
        ];
        PALETTE[scene_number as usize % PALETTE.len()]
    }

    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();
        visuals.panel_fill = Self::bg1();
        visuals.window_fill = Self::bg2();
        visuals.extreme_bg_color = Self::bg();
        visuals.selection.stroke = Stroke::new(1.0, Self::accent());
        visuals.widgets.inactive.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.hovered.rounding = Rounding::same(Self::RADIUS);
        ctx.set_style(style);
    }
}
